//! Quote Poller - Fixed-delay Router Polling Loop
//!
//! Every cycle walks the registry's pairs in order and, for each:
//! 1. Scales the nominal input to `token_in` base units
//! 2. Asks the router for `getAmountsOut` over `[in, intermediate, out]`
//! 3. Renders the last amount at the configured scale
//! 4. Reports the quote to the sink
//!
//! A separator closes every cycle. The next cycle starts one interval
//! after the previous one *finished*; cycles never overlap. A failing
//! pair is logged and skipped, it never stops the loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::config::PollerConfig;
use crate::domain::quote::{Quote, QuoteScale};
use crate::domain::route::RouterEndpoint;
use crate::domain::token::{Pair, TokenRegistry};
use crate::domain::units::{format_units, to_base_units};
use crate::ports::router::{QuoteError, RouterQuoter};
use crate::ports::sink::QuoteSink;

/// Poller tuning resolved from `[poller]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerSettings {
  /// Delay between the end of one cycle and the start of the next.
  pub interval: Duration,
  /// Nominal input amount in whole `token_in` units.
  pub amount_in: Decimal,
  /// Precision used to render the output amount.
  pub quote_scale: QuoteScale,
}

impl Default for PollerSettings {
  fn default() -> Self {
    Self {
      interval: Duration::from_millis(3_000),
      amount_in: Decimal::ONE,
      quote_scale: QuoteScale::TokenOut,
    }
  }
}

impl PollerSettings {
  /// Resolve settings from the validated `[poller]` section.
  pub fn from_config(config: &PollerConfig) -> Result<Self> {
    Ok(Self {
      interval: Duration::from_millis(config.interval_ms),
      amount_in: config.amount_in()?,
      quote_scale: config.quote_scale,
    })
  }
}

/// A pair that could not be quoted in a cycle.
#[derive(Debug, Clone)]
pub struct PairFailure {
  /// `SYMBOL_IN/SYMBOL_OUT`.
  pub pair: String,
  /// Metric label of the failure.
  pub kind: &'static str,
  /// Rendered error.
  pub error: String,
}

/// Outcome of a single polling cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
  /// Quotes emitted, in pair order.
  pub quotes: Vec<Quote>,
  /// Pairs that failed, in pair order.
  pub failures: Vec<PairFailure>,
  /// Wall time spent in the cycle.
  pub elapsed: Duration,
}

/// Delay-then-run quote poller.
pub struct QuotePoller<R: RouterQuoter, S: QuoteSink> {
  /// Router quote source.
  router: Arc<R>,
  /// Output for resolved quotes.
  sink: Arc<S>,
  /// Tokens and pairs to poll.
  registry: Arc<TokenRegistry>,
  /// Router contract and intermediate hop.
  endpoint: RouterEndpoint,
  /// Interval, input amount and display scale.
  settings: PollerSettings,
  /// Prometheus counters.
  metrics: Arc<MetricsRegistry>,
}

impl<R: RouterQuoter, S: QuoteSink> QuotePoller<R, S> {
  /// Create a new poller.
  pub fn new(
    router: Arc<R>,
    sink: Arc<S>,
    registry: Arc<TokenRegistry>,
    endpoint: RouterEndpoint,
    settings: PollerSettings,
    metrics: Arc<MetricsRegistry>,
  ) -> Self {
    Self {
      router,
      sink,
      registry,
      endpoint,
      settings,
      metrics,
    }
  }

  /// Poll forever.
  ///
  /// Starts idle: the first cycle runs one interval after the call, and
  /// each later cycle one interval after the previous one returned.
  /// Only dropping the future (or the process exiting) stops it.
  pub async fn start(&self) {
    info!(
      pairs = self.registry.pairs().len(),
      interval_ms = self.settings.interval.as_millis() as u64,
      amount_in = %self.settings.amount_in,
      quote_scale = ?self.settings.quote_scale,
      "Quote poller started"
    );

    let mut cycle: u64 = 0;
    loop {
      tokio::time::sleep(self.settings.interval).await;
      cycle += 1;

      let report = self.run_cycle().await;
      debug!(
        cycle,
        quoted = report.quotes.len(),
        failed = report.failures.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Cycle complete"
      );
    }
  }

  /// Run exactly one polling pass over all pairs, sequentially.
  #[instrument(skip(self))]
  pub async fn run_cycle(&self) -> CycleReport {
    let started = Instant::now();
    let mut report = CycleReport::default();

    for pair in self.registry.pairs() {
      let label = pair.label();
      match self.quote_pair(pair).await {
        Ok(quote) => {
          self.sink.quote(&quote);
          self.metrics.quotes.with_label_values(&[label.as_str()]).inc();
          if let Ok(price) = quote.price.parse::<f64>() {
            self.metrics.last_quote.with_label_values(&[label.as_str()]).set(price);
          }
          report.quotes.push(quote);
        }
        Err(e) => {
          warn!(pair = %label, kind = e.kind(), error = %e, "Quote failed, continuing with next pair");
          self
            .metrics
            .quote_failures
            .with_label_values(&[label.as_str(), e.kind()])
            .inc();
          report.failures.push(PairFailure {
            pair: label,
            kind: e.kind(),
            error: e.to_string(),
          });
        }
      }
    }

    self.sink.separator();

    report.elapsed = started.elapsed();
    self.metrics.cycle_duration.observe(report.elapsed.as_secs_f64());
    report
  }

  /// Quote one pair through the intermediate token.
  async fn quote_pair(&self, pair: &Pair) -> Result<Quote, QuoteError> {
    let amount_in = to_base_units(self.settings.amount_in, pair.token_in.decimals)?;
    let route = self.endpoint.route(pair);

    let amounts = self.router.amounts_out(amount_in, &route).await?;
    if amounts.len() != route.len() {
      return Err(QuoteError::UnexpectedShape {
        expected: route.len(),
        got: amounts.len(),
      });
    }
    let amount_out = *amounts.last().ok_or(QuoteError::UnexpectedShape {
      expected: route.len(),
      got: 0,
    })?;

    let price = format_units(amount_out, self.settings.quote_scale.decimals_for(pair))?;

    Ok(Quote {
      pair: pair.clone(),
      amount_in,
      amount_out,
      price,
      observed_at: Utc::now(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_settings_default_to_three_seconds_one_unit() {
    let settings = PollerSettings::default();
    assert_eq!(settings.interval, Duration::from_millis(3_000));
    assert_eq!(settings.amount_in, Decimal::ONE);
    assert_eq!(settings.quote_scale, QuoteScale::TokenOut);
  }

  #[test]
  fn test_settings_from_config() {
    let config = PollerConfig {
      interval_ms: 500,
      amount_in: "2.5".to_string(),
      quote_scale: QuoteScale::TokenIn,
      ..PollerConfig::default()
    };
    let settings = PollerSettings::from_config(&config).unwrap();
    assert_eq!(settings.interval, Duration::from_millis(500));
    assert_eq!(settings.amount_in, rust_decimal_macros::dec!(2.5));
    assert_eq!(settings.quote_scale, QuoteScale::TokenIn);
  }
}
