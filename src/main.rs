//! Router Price Ticker — Entry Point
//!
//! Wiring sequence:
//! 1. Load `.env`, then config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Resolve the RPC URL (fails fast without the credential)
//! 4. Connect to the node and check the chain ID
//! 5. Verify router/token contracts have code
//! 6. Spawn metrics (:9090) and health servers
//! 7. Run the quote poller until SIGINT

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use router_price_ticker::adapters::chain::{ContractValidator, EthereumProvider, UniswapV2Router};
use router_price_ticker::adapters::console::ConsoleSink;
use router_price_ticker::adapters::metrics::{HealthServer, HealthState, MetricsRegistry};
use router_price_ticker::config::loader::{config_path_from_env, load_config};
use router_price_ticker::usecases::{PollerSettings, QuotePoller};

/// How often the RPC connection is re-checked for readiness.
const RPC_HEALTH_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load .env and config.toml ────────────────────────
    dotenvy::dotenv().ok();
    let config_path = config_path_from_env();
    let config = load_config(&config_path).context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.ticker.log_level)),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    info!(
        name = %config.ticker.name,
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        pairs = config.pairs.len(),
        "Starting router price ticker"
    );

    // ── 3. Build immutable inputs (fail fast) ───────────────
    let rpc_url = config
        .rpc
        .resolve_url_from_env()
        .context("RPC endpoint is not configured")?;
    let registry = Arc::new(config.registry()?);
    let endpoint = config.router_endpoint()?;
    let settings = PollerSettings::from_config(&config.poller)?;

    // ── 4. Shutdown channel + observability ─────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);
    let health = Arc::new(HealthState::new());

    let mut server_handles = Vec::new();
    if config.metrics.enabled {
        let metrics_ref = Arc::clone(&metrics);
        let bind = config.metrics.bind_address.clone();
        let rx = shutdown_tx.subscribe();
        server_handles.push(tokio::spawn(async move {
            if let Err(e) = metrics_ref.serve(bind, rx).await {
                error!(error = %e, "Metrics server failed");
            }
        }));

        let server = HealthServer::new(Arc::clone(&health), config.metrics.health_port);
        let rx = shutdown_tx.subscribe();
        server_handles.push(tokio::spawn(async move {
            if let Err(e) = server.run(rx).await {
                error!(error = %e, "Health server failed");
            }
        }));
    }

    // ── 5. Connect + validate contracts ─────────────────────
    let provider = Arc::new(
        EthereumProvider::connect(&rpc_url, config.rpc.expected_chain_id)
            .await
            .context("Failed to connect to Ethereum RPC")?,
    );
    health.set_rpc_healthy(true);

    ContractValidator::new(provider.inner())
        .validate_all(&endpoint, &registry)
        .await
        .context("Contract validation failed")?;

    let health_provider = Arc::clone(&provider);
    let health_state = Arc::clone(&health);
    let mut health_shutdown = shutdown_tx.subscribe();
    let rpc_watch = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = health_shutdown.recv() => break,
                () = tokio::time::sleep(RPC_HEALTH_INTERVAL) => {
                    let healthy = health_provider.is_healthy().await;
                    if !healthy {
                        warn!("RPC health check failed");
                    }
                    health_state.set_rpc_healthy(healthy);
                }
            }
        }
    });

    // ── 6. Wire the poller ──────────────────────────────────
    let mut router = UniswapV2Router::new(provider.inner(), endpoint.router);
    if let Some(rps) = config.rpc.max_requests_per_second {
        router = router.with_rate_limit(rps);
    }
    let sink = Arc::new(ConsoleSink::stdout(config.poller.separator.clone()));
    let poller = QuotePoller::new(
        Arc::new(router),
        sink,
        Arc::clone(&registry),
        endpoint,
        settings,
        Arc::clone(&metrics),
    );

    health.set_poller_running(true);

    // ── 7. Poll until SIGINT ────────────────────────────────
    tokio::select! {
        () = poller.start() => {}
        res = signal::ctrl_c() => {
            if let Err(e) = res {
                error!(error = %e, "Failed to listen for SIGINT");
            }
            info!("SIGINT received, shutting down");
        }
    }

    health.set_poller_running(false);
    let _ = shutdown_tx.send(());

    let _ = tokio::time::timeout(Duration::from_secs(5), rpc_watch).await;
    for handle in server_handles {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    info!("Shutdown complete");
    Ok(())
}
