//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;

use super::AppConfig;
use crate::domain::units::{MAX_DECIMALS, to_base_units};

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "TICKER_CONFIG";

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Config path from `TICKER_CONFIG`, falling back to `config.toml`.
pub fn config_path_from_env() -> String {
  std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    pairs = config.pairs.len(),
    tokens = config.tokens.len(),
    interval_ms = config.poller.interval_ms,
    quote_scale = ?config.poller.quote_scale,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Parseable, distinct addresses for router and tokens
/// - Token precision within `U256` range
/// - Pairs referencing known tokens
/// - A positive polling interval and input amount
/// - An input amount every pair's `token_in` can represent
fn validate_config(config: &AppConfig) -> Result<()> {
  // Token validation
  for token in &config.tokens {
    anyhow::ensure!(
      !token.symbol.trim().is_empty(),
      "Token with address {} has an empty symbol",
      token.address
    );
    anyhow::ensure!(
      token.decimals <= MAX_DECIMALS,
      "Token {} has {} decimals, maximum supported is {}",
      token.symbol,
      token.decimals,
      MAX_DECIMALS
    );
  }

  // Registry + router (addresses parse, pairs resolve)
  let registry = config.registry()?;
  let endpoint = config.router_endpoint()?;
  anyhow::ensure!(
    endpoint.router != endpoint.intermediate,
    "router.address and router.intermediate must differ"
  );

  // Poller validation
  anyhow::ensure!(
    config.poller.interval_ms > 0,
    "poller.interval_ms must be positive, got {}",
    config.poller.interval_ms
  );
  let amount_in = config.poller.amount_in()?;
  anyhow::ensure!(
    amount_in > Decimal::ZERO,
    "poller.amount_in must be positive, got {}",
    amount_in
  );
  for pair in registry.pairs() {
    to_base_units(amount_in, pair.token_in.decimals).with_context(|| {
      format!(
        "poller.amount_in {} cannot be expressed in {} base units ({} decimals)",
        amount_in, pair.token_in.symbol, pair.token_in.decimals
      )
    })?;
  }

  // RPC validation
  anyhow::ensure!(
    !config.rpc.url_template.trim().is_empty(),
    "rpc.url_template must not be empty"
  );
  if config.rpc.requires_api_key() {
    anyhow::ensure!(
      !config.rpc.api_key_env.trim().is_empty(),
      "rpc.api_key_env must name an environment variable"
    );
  }
  if let Some(rps) = config.rpc.max_requests_per_second {
    anyhow::ensure!(rps > 0, "rpc.max_requests_per_second must be positive when set");
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_shipped_config_matches_defaults() {
    let shipped = parse_config(include_str!("../../config.toml")).unwrap();
    let defaults = parse_config("").unwrap();
    assert_eq!(shipped.registry().unwrap().pairs(), defaults.registry().unwrap().pairs());
    assert_eq!(shipped.router_endpoint().unwrap(), defaults.router_endpoint().unwrap());
    assert_eq!(shipped.poller.separator, defaults.poller.separator);
  }

  #[test]
  fn test_empty_config_is_valid() {
    let config = parse_config("").unwrap();
    assert_eq!(config.pairs.len(), 2);
  }

  #[test]
  fn test_rejects_zero_interval() {
    let err = parse_config("[poller]\ninterval_ms = 0\n").unwrap_err();
    assert!(err.to_string().contains("interval_ms"));
  }

  #[test]
  fn test_rejects_non_positive_amount() {
    assert!(parse_config("[poller]\namount_in = \"0\"\n").is_err());
    assert!(parse_config("[poller]\namount_in = \"one\"\n").is_err());
  }

  #[test]
  fn test_rejects_unknown_pair_symbol() {
    let err = parse_config(
      r#"
        [[pairs]]
        token_in = "USDT"
        token_out = "WBTC"
      "#,
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("WBTC"));
  }

  #[test]
  fn test_accepts_high_precision_tokens() {
    let config = parse_config(
      r#"
        [[tokens]]
        symbol = "USDT"
        address = "0xdAC17F958D2ee523a2206206994597C13D831ec7"
        decimals = 6

        [[tokens]]
        symbol = "USDC"
        address = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
        decimals = 36
      "#,
    )
    .unwrap();
    assert_eq!(config.registry().unwrap().pairs()[1].token_in.decimals, 36);
  }

  #[test]
  fn test_rejects_oversized_decimals() {
    let err = parse_config(
      r#"
        [[tokens]]
        symbol = "ODD"
        address = "0x6B175474E89094C44Da98b954EedeAC495271d0F"
        decimals = 90
      "#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("ODD"));
  }

  #[test]
  fn test_rejects_amount_finer_than_input_token() {
    let err = parse_config(
      r#"
        [poller]
        amount_in = "0.5"

        [[tokens]]
        symbol = "TIX"
        address = "0x1111111111111111111111111111111111111111"
        decimals = 0

        [[tokens]]
        symbol = "PTS"
        address = "0x2222222222222222222222222222222222222222"
        decimals = 0

        [[pairs]]
        token_in = "TIX"
        token_out = "PTS"
      "#,
    )
    .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("TIX"), "unexpected error: {message}");
    assert!(message.contains("fractional digits"), "unexpected error: {message}");
  }

  #[test]
  fn test_accepts_fractional_amount_on_six_decimal_tokens() {
    let config = parse_config("[poller]\namount_in = \"0.5\"\n").unwrap();
    assert_eq!(config.poller.amount_in, "0.5");
  }

  #[test]
  fn test_accepts_empty_pair_list() {
    let config = parse_config("pairs = []\n").unwrap();
    assert!(config.registry().unwrap().pairs().is_empty());
  }

  #[test]
  fn test_rejects_zero_rate_limit() {
    assert!(parse_config("[rpc]\nmax_requests_per_second = 0\n").is_err());
  }
}
