//! Domain layer - tokens, routes, quotes and unit conversion.
//!
//! Pure data and arithmetic. Nothing here talks to the network;
//! the registry and router endpoint are built once at startup and
//! handed to the poller read-only.

pub mod quote;
pub mod route;
pub mod token;
pub mod units;

// Re-export core types for convenience
pub use quote::{Quote, QuoteScale};
pub use route::{Route, RouterEndpoint};
pub use token::{Pair, RegistryError, Token, TokenRegistry};
pub use units::{UnitsError, format_units, to_base_units};
