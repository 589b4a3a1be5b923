//! Chain Adapters - Ethereum JSON-RPC Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - RPC provider management with chain ID check
//! - Router `getAmountsOut` quotes
//! - Startup validation of configured contract addresses

pub mod provider;
pub mod router;
pub mod validator;

pub use provider::EthereumProvider;
pub use router::UniswapV2Router;
pub use validator::ContractValidator;
