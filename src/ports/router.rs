//! Router Quoter Port - Read-only Swap Quote Interface
//!
//! Defines the trait the poller uses to ask a router contract how much
//! of the last token a route produces for a given input. Implemented
//! over JSON-RPC by `adapters::chain::UniswapV2Router`.

use alloy::primitives::U256;
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::route::Route;
use crate::domain::units::UnitsError;

/// Per-pair quote failure.
///
/// Every variant is recoverable: the poller logs it and moves on to
/// the next pair.
#[derive(Debug, Error)]
pub enum QuoteError {
  /// Transport or node error (timeout, HTTP failure, revert).
  #[error("router call failed: {0}")]
  Rpc(String),
  /// Response bytes could not be ABI-decoded as `uint256[]`.
  #[error("router response could not be decoded: {0}")]
  Decode(String),
  /// Decoded amounts do not line up with the route.
  #[error("router returned {got} amounts for a {expected}-hop route")]
  UnexpectedShape {
    /// Route length.
    expected: usize,
    /// Amounts received.
    got: usize,
  },
  /// Input or output amount could not be converted.
  #[error(transparent)]
  Amount(#[from] UnitsError),
}

impl QuoteError {
  /// Stable label for metrics.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Rpc(_) => "rpc",
      Self::Decode(_) | Self::UnexpectedShape { .. } => "decode",
      Self::Amount(_) => "amount",
    }
  }
}

/// Trait for read-only router quotes (`getAmountsOut`).
#[async_trait]
pub trait RouterQuoter: Send + Sync + 'static {
  /// Amounts produced along `route` for `amount_in` base units of the
  /// first token. One entry per hop; the first echoes the input and
  /// the last is the output in the final token's base units.
  async fn amounts_out(&self, amount_in: U256, route: &Route) -> Result<Vec<U256>, QuoteError>;
}
