//! Configuration Module - TOML-based Ticker Configuration
//!
//! Loads and validates configuration from `config.toml`. Every section
//! has defaults matching the Ethereum mainnet ticker (Uniswap V2 router,
//! WETH hop, USDT/USDC both ways), so an empty file is a valid config.
//! The only required input is the RPC credential, read from the
//! environment (optionally via `.env`).

pub mod loader;

use std::str::FromStr;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::quote::QuoteScale;
use crate::domain::route::{RouterEndpoint, UNISWAP_V2_ROUTER, WETH_ADDRESS};
use crate::domain::token::{Token, TokenRegistry, USDC_ADDRESS, USDT_ADDRESS};

/// Placeholder substituted with the API key in `rpc.url_template`.
pub const API_KEY_PLACEHOLDER: &str = "{api_key}";

/// Top-level ticker configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// Process identity and logging.
  #[serde(default)]
  pub ticker: TickerConfig,
  /// JSON-RPC endpoint.
  #[serde(default)]
  pub rpc: RpcConfig,
  /// Router contract and routing hop.
  #[serde(default)]
  pub router: RouterConfig,
  /// Polling loop parameters.
  #[serde(default)]
  pub poller: PollerConfig,
  /// Token definitions.
  #[serde(default = "default_tokens")]
  pub tokens: Vec<TokenConfig>,
  /// Pairs to quote, in polling order.
  #[serde(default = "default_pairs")]
  pub pairs: Vec<PairConfig>,
  /// Metrics and health endpoints.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Process identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerConfig {
  /// Human-readable name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// RPC endpoint configuration.
///
/// The resolved URL embeds a secret and is never logged.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
  /// Endpoint URL; `{api_key}` is replaced with the credential.
  #[serde(default = "default_url_template")]
  pub url_template: String,
  /// Environment variable holding the credential.
  #[serde(default = "default_api_key_env")]
  pub api_key_env: String,
  /// Chain ID the node must report at startup.
  #[serde(default = "default_chain_id")]
  pub expected_chain_id: u64,
  /// Optional cap on `eth_call` requests per second.
  #[serde(default)]
  pub max_requests_per_second: Option<u32>,
}

/// Router contract configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
  /// Uniswap V2 style router address.
  #[serde(default = "default_router_address")]
  pub address: String,
  /// Intermediate token every route passes through.
  #[serde(default = "default_intermediate")]
  pub intermediate: String,
}

/// Polling loop configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
  /// Delay between the end of one cycle and the start of the next.
  #[serde(default = "default_interval_ms")]
  pub interval_ms: u64,
  /// Nominal input amount in whole `token_in` units.
  #[serde(default = "default_amount_in")]
  pub amount_in: String,
  /// Precision used to render the output amount.
  #[serde(default)]
  pub quote_scale: QuoteScale,
  /// Line printed after every cycle.
  #[serde(default = "default_separator")]
  pub separator: String,
}

/// Single token definition.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
  /// Display symbol, unique across tokens.
  pub symbol: String,
  /// ERC-20 contract address.
  pub address: String,
  /// Base-unit precision.
  pub decimals: u32,
}

/// Quote direction, by token symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct PairConfig {
  pub token_in: String,
  pub token_out: String,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics and health endpoints.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Metrics server bind address.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
  /// Health check endpoint port.
  #[serde(default = "default_health_port")]
  pub health_port: u16,
}

impl AppConfig {
  /// Build the immutable token registry from `tokens` and `pairs`.
  pub fn registry(&self) -> Result<TokenRegistry> {
    let tokens = self
      .tokens
      .iter()
      .map(|t| {
        let address = parse_address(&t.address)
          .with_context(|| format!("Invalid address for token {}", t.symbol))?;
        Ok(Token::new(t.symbol.clone(), address, t.decimals))
      })
      .collect::<Result<Vec<_>>>()?;

    let pairs: Vec<(&str, &str)> = self
      .pairs
      .iter()
      .map(|p| (p.token_in.as_str(), p.token_out.as_str()))
      .collect();

    TokenRegistry::new(tokens, &pairs).context("Invalid token/pair configuration")
  }

  /// Router endpoint from the `[router]` section.
  pub fn router_endpoint(&self) -> Result<RouterEndpoint> {
    let router = parse_address(&self.router.address).context("Invalid router.address")?;
    let intermediate =
      parse_address(&self.router.intermediate).context("Invalid router.intermediate")?;
    Ok(RouterEndpoint::new(router, intermediate))
  }
}

impl RpcConfig {
  /// Whether the template needs a credential substituted.
  pub fn requires_api_key(&self) -> bool {
    self.url_template.contains(API_KEY_PLACEHOLDER)
  }

  /// Resolve the endpoint URL, pulling the credential through `lookup`.
  ///
  /// # Errors
  /// Fails when the template needs a key and `lookup` yields nothing
  /// (or only whitespace) for `api_key_env`.
  pub fn resolve_url<F>(&self, lookup: F) -> Result<String>
  where
    F: Fn(&str) -> Option<String>,
  {
    if !self.requires_api_key() {
      return Ok(self.url_template.clone());
    }

    let key = lookup(&self.api_key_env)
      .map(|k| k.trim().to_string())
      .filter(|k| !k.is_empty())
      .with_context(|| {
        format!(
          "RPC credential missing: set {} in the environment or .env",
          self.api_key_env
        )
      })?;

    Ok(self.url_template.replace(API_KEY_PLACEHOLDER, &key))
  }

  /// Resolve the endpoint URL from the process environment.
  pub fn resolve_url_from_env(&self) -> Result<String> {
    self.resolve_url(|name| std::env::var(name).ok())
  }
}

impl PollerConfig {
  /// Parsed nominal input amount.
  pub fn amount_in(&self) -> Result<rust_decimal::Decimal> {
    rust_decimal::Decimal::from_str(self.amount_in.trim())
      .with_context(|| format!("poller.amount_in is not a decimal: {}", self.amount_in))
  }
}

fn parse_address(raw: &str) -> Result<Address> {
  Address::from_str(raw.trim()).with_context(|| format!("Not an EVM address: {raw}"))
}

impl Default for TickerConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

impl Default for RpcConfig {
  fn default() -> Self {
    Self {
      url_template: default_url_template(),
      api_key_env: default_api_key_env(),
      expected_chain_id: default_chain_id(),
      max_requests_per_second: None,
    }
  }
}

impl Default for RouterConfig {
  fn default() -> Self {
    Self {
      address: default_router_address(),
      intermediate: default_intermediate(),
    }
  }
}

impl Default for PollerConfig {
  fn default() -> Self {
    Self {
      interval_ms: default_interval_ms(),
      amount_in: default_amount_in(),
      quote_scale: QuoteScale::default(),
      separator: default_separator(),
    }
  }
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: default_true(),
      bind_address: default_metrics_addr(),
      health_port: default_health_port(),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "router-price-ticker".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_url_template() -> String {
  format!("https://mainnet.infura.io/v3/{API_KEY_PLACEHOLDER}")
}

fn default_api_key_env() -> String {
  "ETHEREUM_RPC_INFURA_KEY".to_string()
}

fn default_chain_id() -> u64 {
  1
}

fn default_router_address() -> String {
  UNISWAP_V2_ROUTER.to_string()
}

fn default_intermediate() -> String {
  WETH_ADDRESS.to_string()
}

fn default_interval_ms() -> u64 {
  3_000
}

fn default_amount_in() -> String {
  "1".to_string()
}

fn default_separator() -> String {
  "-".repeat(23)
}

fn default_tokens() -> Vec<TokenConfig> {
  vec![
    TokenConfig {
      symbol: "USDT".to_string(),
      address: USDT_ADDRESS.to_string(),
      decimals: 6,
    },
    TokenConfig {
      symbol: "USDC".to_string(),
      address: USDC_ADDRESS.to_string(),
      decimals: 6,
    },
  ]
}

fn default_pairs() -> Vec<PairConfig> {
  vec![
    PairConfig {
      token_in: "USDT".to_string(),
      token_out: "USDC".to_string(),
    },
    PairConfig {
      token_in: "USDC".to_string(),
      token_out: "USDT".to_string(),
    },
  ]
}

fn default_true() -> bool {
  true
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}

fn default_health_port() -> u16 {
  8080
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_file_yields_mainnet_defaults() {
    let config: AppConfig = toml::from_str("").unwrap();
    assert_eq!(config.poller.interval_ms, 3_000);
    assert_eq!(config.poller.quote_scale, QuoteScale::TokenOut);
    assert_eq!(config.rpc.expected_chain_id, 1);

    let registry = config.registry().unwrap();
    let mainnet = TokenRegistry::mainnet();
    assert_eq!(registry.pairs(), mainnet.pairs());
    assert_eq!(config.router_endpoint().unwrap(), RouterEndpoint::mainnet());
  }

  #[test]
  fn test_derived_default_leaves_lists_empty() {
    // `AppConfig::default()` leaves tokens/pairs empty; serde fills them.
    let derived = AppConfig::default();
    assert!(derived.pairs.is_empty());
    assert_eq!(derived.poller.separator, "-----------------------");
  }

  #[test]
  fn test_resolve_url_substitutes_key() {
    let rpc = RpcConfig::default();
    let url = rpc
      .resolve_url(|name| (name == "ETHEREUM_RPC_INFURA_KEY").then(|| "abc123".to_string()))
      .unwrap();
    assert_eq!(url, "https://mainnet.infura.io/v3/abc123");
  }

  #[test]
  fn test_resolve_url_fails_fast_without_key() {
    let rpc = RpcConfig::default();
    let err = rpc.resolve_url(|_| None).unwrap_err();
    assert!(err.to_string().contains("ETHEREUM_RPC_INFURA_KEY"));
  }

  #[test]
  fn test_resolve_url_rejects_blank_key() {
    let rpc = RpcConfig::default();
    assert!(rpc.resolve_url(|_| Some("   ".to_string())).is_err());
  }

  #[test]
  fn test_template_without_placeholder_needs_no_key() {
    let rpc = RpcConfig {
      url_template: "http://127.0.0.1:8545".to_string(),
      ..RpcConfig::default()
    };
    assert!(!rpc.requires_api_key());
    assert_eq!(rpc.resolve_url(|_| None).unwrap(), "http://127.0.0.1:8545");
  }

  #[test]
  fn test_custom_tokens_and_pairs() {
    let config: AppConfig = toml::from_str(
      r#"
        [[tokens]]
        symbol = "DAI"
        address = "0x6B175474E89094C44Da98b954EedeAC495271d0F"
        decimals = 18

        [[tokens]]
        symbol = "USDC"
        address = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
        decimals = 6

        [[pairs]]
        token_in = "DAI"
        token_out = "USDC"
      "#,
    )
    .unwrap();

    let registry = config.registry().unwrap();
    assert_eq!(registry.pairs().len(), 1);
    assert_eq!(registry.pairs()[0].token_in.decimals, 18);
  }

  #[test]
  fn test_bad_token_address_is_reported() {
    let config: AppConfig = toml::from_str(
      r#"
        [[tokens]]
        symbol = "BAD"
        address = "0x1234"
        decimals = 6
      "#,
    )
    .unwrap();
    let err = format!("{:#}", config.registry().unwrap_err());
    assert!(err.contains("BAD"), "unexpected error: {err}");
  }
}
