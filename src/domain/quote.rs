//! Router quotes and their display scale.

use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::token::Pair;

/// Which token's precision is used to render the router's output amount.
///
/// The router returns the final hop in `token_out` base units, so
/// `TokenOut` is correct. `TokenIn` reproduces the legacy ticker, which
/// scaled by the input token and was only right while both tokens
/// shared the same precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteScale {
    #[default]
    TokenOut,
    TokenIn,
}

impl QuoteScale {
    pub fn decimals_for(self, pair: &Pair) -> u32 {
        match self {
            Self::TokenOut => pair.token_out.decimals,
            Self::TokenIn => pair.token_in.decimals,
        }
    }
}

/// One resolved quote for a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub pair: Pair,
    /// Input in `token_in` base units.
    pub amount_in: U256,
    /// Final route amount, in `token_out` base units.
    pub amount_out: U256,
    /// `amount_out` rendered at the configured scale, trailing zeros trimmed.
    pub price: String,
    pub observed_at: DateTime<Utc>,
}

impl std::fmt::Display for Quote {
    /// `USDT => USDC : 0.99`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} => {} : {}",
            self.pair.token_in.symbol, self.pair.token_out.symbol, self.price
        )
    }
}
