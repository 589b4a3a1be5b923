//! Prometheus Metrics Registry - Ticker Observability
//!
//! Registers and exposes Prometheus metrics for the quote poller:
//! per-pair quote and failure counters, the latest quoted price and
//! cycle duration.

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use prometheus::{
    Encoder, GaugeVec, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use tokio::sync::broadcast;
use tracing::{info, instrument};

/// Centralized Prometheus metrics for the ticker.
///
/// All metrics follow the naming convention `ticker_*` and carry a
/// `pair` label (`USDT/USDC`) where it applies.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Successful quotes.
    pub quotes: IntCounterVec,
    /// Failed quotes by failure kind.
    pub quote_failures: IntCounterVec,
    /// Most recent price per pair.
    pub last_quote: GaugeVec,
    /// Wall time of one full cycle.
    pub cycle_duration: Histogram,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let quotes = IntCounterVec::new(
            Opts::new("ticker_quotes_total", "Quotes successfully fetched"),
            &["pair"],
        )?;

        let quote_failures = IntCounterVec::new(
            Opts::new("ticker_quote_failures_total", "Quotes that failed"),
            &["pair", "kind"],
        )?;

        let last_quote = GaugeVec::new(
            Opts::new("ticker_last_quote", "Latest quoted output per unit input"),
            &["pair"],
        )?;

        let cycle_duration = Histogram::with_opts(
            HistogramOpts::new(
                "ticker_cycle_duration_seconds",
                "Time spent quoting all pairs in one cycle",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;

        // Register all metrics
        registry.register(Box::new(quotes.clone()))?;
        registry.register(Box::new(quote_failures.clone()))?;
        registry.register(Box::new(last_quote.clone()))?;
        registry.register(Box::new(cycle_duration.clone()))?;

        Ok(Self {
            registry,
            quotes,
            quote_failures,
            last_quote,
            cycle_duration,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&metrics_self);
                async move {
                    match metrics.render() {
                        Ok(body) => (StatusCode::OK, body),
                        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
                    }
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
