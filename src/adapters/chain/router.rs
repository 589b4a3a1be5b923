//! Uniswap V2 Router - `getAmountsOut` over JSON-RPC
//!
//! Implements the `RouterQuoter` port with a single `eth_call` per
//! quote. Calldata is built from the `sol!` binding below; the reply
//! is decoded as `uint256[]`. Nothing here validates liquidity: the
//! router's answer is taken as-is.

use std::num::NonZeroU32;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use tracing::{debug, instrument};

use crate::domain::route::Route;
use crate::ports::router::{QuoteError, RouterQuoter};

sol! {
    /// Read-only subset of IUniswapV2Router02.
    interface IUniswapV2Router02 {
        function getAmountsOut(uint256 amountIn, address[] calldata path)
            external
            view
            returns (uint256[] memory amounts);
    }
}

/// Build the `getAmountsOut` calldata for a route.
pub fn encode_amounts_out(amount_in: U256, route: &Route) -> Bytes {
    IUniswapV2Router02::getAmountsOutCall {
        amountIn: amount_in,
        path: route.to_vec(),
    }
    .abi_encode()
    .into()
}

/// Decode the `uint256[]` returned by `getAmountsOut`.
pub fn decode_amounts_out(output: &[u8]) -> Result<Vec<U256>, QuoteError> {
    IUniswapV2Router02::getAmountsOutCall::abi_decode_returns(output, true)
        .map(|ret| ret.amounts)
        .map_err(|e| QuoteError::Decode(e.to_string()))
}

/// Router quoter backed by an alloy provider.
pub struct UniswapV2Router {
    /// Shared RPC provider.
    provider: Arc<dyn Provider + Send + Sync>,
    /// Router contract address.
    router: Address,
    /// Optional request pacing.
    limiter: Option<DefaultDirectRateLimiter>,
}

impl UniswapV2Router {
    pub fn new(provider: Arc<dyn Provider + Send + Sync>, router: Address) -> Self {
        Self {
            provider,
            router,
            limiter: None,
        }
    }

    /// Cap outgoing `eth_call`s at `per_second`. Zero disables pacing.
    pub fn with_rate_limit(mut self, per_second: u32) -> Self {
        self.limiter = NonZeroU32::new(per_second)
            .map(|rate| DefaultDirectRateLimiter::direct(Quota::per_second(rate)));
        self
    }
}

#[async_trait]
impl RouterQuoter for UniswapV2Router {
    #[instrument(skip(self, route), fields(router = %self.router, hops = route.len()))]
    async fn amounts_out(&self, amount_in: U256, route: &Route) -> Result<Vec<U256>, QuoteError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let tx = TransactionRequest::default()
            .to(self.router)
            .input(encode_amounts_out(amount_in, route).into());

        let output = self
            .provider
            .call(&tx)
            .await
            .map_err(|e| QuoteError::Rpc(e.to_string()))?;

        let amounts = decode_amounts_out(&output)?;
        debug!(%amount_in, amounts = ?amounts, "getAmountsOut returned");
        Ok(amounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolValue;

    use crate::domain::route::RouterEndpoint;
    use crate::domain::token::{Pair, Token};

    #[test]
    fn test_calldata_starts_with_selector() {
        let route = RouterEndpoint::mainnet().route(&Pair::new(Token::usdt(), Token::usdc()));
        let calldata = encode_amounts_out(U256::from(1_000_000u64), &route);
        // keccak256("getAmountsOut(uint256,address[])")[..4]
        assert_eq!(&calldata[..4], &[0xd0, 0x6c, 0xa6, 0x1f]);
        // selector + amount + offset + length + 3 addresses
        assert_eq!(calldata.len(), 4 + 32 * 6);
    }

    #[test]
    fn test_decode_amounts() {
        let amounts = vec![
            U256::from(1_000_000u64),
            U256::from(500_000_000_000_000_000u128),
            U256::from(990_000u64),
        ];
        let encoded = (amounts.clone(),).abi_encode_params();
        assert_eq!(decode_amounts_out(&encoded).unwrap(), amounts);
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = decode_amounts_out(&[0x01, 0x02]).unwrap_err();
        assert_eq!(err.kind(), "decode");
    }
}
