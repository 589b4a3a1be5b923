//! Router endpoint and multi-hop routes.
//!
//! Quotes are always requested through one intermediate token:
//! `[token_in, intermediate, token_out]`.

use alloy::primitives::{Address, address};

use super::token::Pair;

/// Uniswap V2 Router02 on Ethereum mainnet.
pub const UNISWAP_V2_ROUTER: Address = address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D");

/// Wrapped Ether on Ethereum mainnet.
pub const WETH_ADDRESS: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

/// Ordered token addresses a hypothetical swap would traverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route(Vec<Address>);

impl Route {
    pub fn new(hops: Vec<Address>) -> Self {
        Self(hops)
    }

    pub fn hops(&self) -> &[Address] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Address> {
        self.0.clone()
    }
}

/// Router contract plus the intermediate hop used for every route.
///
/// Fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterEndpoint {
    pub router: Address,
    pub intermediate: Address,
}

impl RouterEndpoint {
    pub fn new(router: Address, intermediate: Address) -> Self {
        Self {
            router,
            intermediate,
        }
    }

    /// Uniswap V2 router routing through WETH.
    pub fn mainnet() -> Self {
        Self::new(UNISWAP_V2_ROUTER, WETH_ADDRESS)
    }

    /// Three-hop route `[token_in, intermediate, token_out]` for a pair.
    pub fn route(&self, pair: &Pair) -> Route {
        Route::new(vec![
            pair.token_in.address,
            self.intermediate,
            pair.token_out.address,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::{Token, USDC_ADDRESS, USDT_ADDRESS};

    #[test]
    fn test_route_goes_through_intermediate() {
        let endpoint = RouterEndpoint::mainnet();
        let route = endpoint.route(&Pair::new(Token::usdt(), Token::usdc()));
        assert_eq!(route.hops(), &[USDT_ADDRESS, WETH_ADDRESS, USDC_ADDRESS]);
        assert_eq!(route.len(), 3);
    }

    #[test]
    fn test_reverse_pair_reverses_route_ends() {
        let endpoint = RouterEndpoint::mainnet();
        let route = endpoint.route(&Pair::new(Token::usdc(), Token::usdt()));
        assert_eq!(route.hops().first(), Some(&USDC_ADDRESS));
        assert_eq!(route.hops().last(), Some(&USDT_ADDRESS));
    }
}
