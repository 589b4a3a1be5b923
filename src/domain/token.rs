//! Token registry domain types.
//!
//! Defines the tradable tokens, the ordered pairs to quote, and the
//! immutable registry that ties them together. Built once at startup
//! and shared read-only with the poller.

use std::collections::HashSet;

use alloy::primitives::{Address, address};
use thiserror::Error;

// ────────────────────────────────────────────
// Ethereum mainnet constants
// ────────────────────────────────────────────

/// Tether USD on Ethereum mainnet.
pub const USDT_ADDRESS: Address = address!("dAC17F958D2ee523a2206206994597C13D831ec7");

/// USD Coin on Ethereum mainnet.
pub const USDC_ADDRESS: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// Errors raised while assembling a registry from static data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("token symbol {0} is registered more than once")]
    DuplicateSymbol(String),
    #[error("pair {token_in} => {token_out} references unknown token {missing}")]
    UnknownToken {
        token_in: String,
        token_out: String,
        missing: String,
    },
    #[error("pair {0} => {0} quotes a token against itself")]
    SelfPair(String),
}

/// A fungible on-chain asset.
///
/// `decimals` must match the token contract; a mismatch produces wrong
/// human-readable quotes and cannot be detected from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Display name (e.g. "USDT").
    pub symbol: String,
    /// ERC-20 contract address.
    pub address: Address,
    /// Base-unit precision.
    pub decimals: u32,
}

impl Token {
    pub fn new(symbol: impl Into<String>, address: Address, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            address,
            decimals,
        }
    }

    pub fn usdt() -> Self {
        Self::new("USDT", USDT_ADDRESS, 6)
    }

    pub fn usdc() -> Self {
        Self::new("USDC", USDC_ADDRESS, 6)
    }
}

/// An ordered quote direction. `(A, B)` and `(B, A)` are distinct pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub token_in: Token,
    pub token_out: Token,
}

impl Pair {
    pub fn new(token_in: Token, token_out: Token) -> Self {
        Self {
            token_in,
            token_out,
        }
    }

    /// Short label used in logs and metric labels, e.g. `USDT/USDC`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.token_in.symbol, self.token_out.symbol)
    }
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} => {}", self.token_in.symbol, self.token_out.symbol)
    }
}

/// Immutable symbol → token mapping plus the ordered pairs to poll.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
    pairs: Vec<Pair>,
}

impl TokenRegistry {
    /// Build a registry, resolving each `(token_in, token_out)` symbol pair
    /// against `tokens`. Pair order is preserved.
    pub fn new<S: AsRef<str>>(
        tokens: Vec<Token>,
        pairs: &[(S, S)],
    ) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for token in &tokens {
            if !seen.insert(token.symbol.as_str()) {
                return Err(RegistryError::DuplicateSymbol(token.symbol.clone()));
            }
        }

        let mut resolved = Vec::with_capacity(pairs.len());
        for (token_in, token_out) in pairs {
            let (token_in, token_out) = (token_in.as_ref(), token_out.as_ref());
            if token_in == token_out {
                return Err(RegistryError::SelfPair(token_in.to_string()));
            }

            let lookup = |symbol: &str| {
                tokens
                    .iter()
                    .find(|t| t.symbol == symbol)
                    .cloned()
                    .ok_or_else(|| RegistryError::UnknownToken {
                        token_in: token_in.to_string(),
                        token_out: token_out.to_string(),
                        missing: symbol.to_string(),
                    })
            };

            resolved.push(Pair::new(lookup(token_in)?, lookup(token_out)?));
        }

        Ok(Self {
            tokens,
            pairs: resolved,
        })
    }

    /// USDT and USDC on mainnet, quoted in both directions.
    pub fn mainnet() -> Self {
        let usdt = Token::usdt();
        let usdc = Token::usdc();
        Self {
            pairs: vec![
                Pair::new(usdt.clone(), usdc.clone()),
                Pair::new(usdc.clone(), usdt.clone()),
            ],
            tokens: vec![usdt, usdc],
        }
    }

    pub fn token(&self, symbol: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Pairs in polling order.
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_registry_polls_both_directions() {
        let registry = TokenRegistry::mainnet();
        let labels: Vec<String> = registry.pairs().iter().map(Pair::label).collect();
        assert_eq!(labels, vec!["USDT/USDC", "USDC/USDT"]);
        assert_eq!(registry.token("USDT").map(|t| t.decimals), Some(6));
        assert_eq!(registry.token("USDC").map(|t| t.address), Some(USDC_ADDRESS));
    }

    #[test]
    fn test_registry_preserves_pair_order() {
        let registry = TokenRegistry::new(
            vec![Token::usdt(), Token::usdc()],
            &[("USDC", "USDT"), ("USDT", "USDC")],
        )
        .unwrap();
        assert_eq!(registry.pairs()[0].token_in.symbol, "USDC");
        assert_eq!(registry.pairs()[1].token_in.symbol, "USDT");
    }

    #[test]
    fn test_registry_rejects_unknown_symbol() {
        let err = TokenRegistry::new(vec![Token::usdt()], &[("USDT", "DAI")]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownToken {
                token_in: "USDT".to_string(),
                token_out: "DAI".to_string(),
                missing: "DAI".to_string(),
            }
        );
    }

    #[test]
    fn test_registry_rejects_duplicate_symbol() {
        let err = TokenRegistry::new::<&str>(vec![Token::usdt(), Token::usdt()], &[]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateSymbol("USDT".to_string()));
    }

    #[test]
    fn test_registry_rejects_self_pair() {
        let err = TokenRegistry::new(vec![Token::usdt()], &[("USDT", "USDT")]).unwrap_err();
        assert_eq!(err, RegistryError::SelfPair("USDT".to_string()));
    }

    #[test]
    fn test_empty_pair_list_is_valid() {
        let registry = TokenRegistry::new::<&str>(vec![Token::usdt()], &[]).unwrap();
        assert!(registry.pairs().is_empty());
    }

    #[test]
    fn test_pair_display() {
        let pair = Pair::new(Token::usdt(), Token::usdc());
        assert_eq!(pair.to_string(), "USDT => USDC");
    }
}
