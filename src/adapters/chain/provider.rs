//! Ethereum RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the connection to an Ethereum JSON-RPC node via alloy-rs.
//! Validates RPC connectivity and chain ID at startup and exposes a
//! shared provider instance for the router adapter and validator.
//!
//! The provider is stored type-erased as `dyn Provider` so adapters
//! don't leak alloy's nested filler generics.

use std::sync::Arc;

use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{Context, Result};
use tracing::{info, instrument};

/// Shared Ethereum RPC provider backed by alloy-rs 0.9.
///
/// All chain adapters share a single provider instance to avoid
/// redundant connections and enable connection pooling.
pub struct EthereumProvider {
    /// The alloy provider (type-erased).
    provider: Arc<dyn Provider + Send + Sync>,
}

impl EthereumProvider {
    /// Connect to the RPC endpoint and validate the chain ID.
    ///
    /// `rpc_url` carries the API key and is never logged.
    #[instrument(skip_all, fields(expected_chain_id = expected_chain_id))]
    pub async fn connect(rpc_url: &str, expected_chain_id: u64) -> Result<Self> {
        // on_builtin yields a BoxTransport provider; `dyn Provider` needs that.
        let provider = ProviderBuilder::new()
            .on_builtin(rpc_url)
            .await
            .context("Failed to connect to RPC endpoint")?;

        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(provider);

        // Validate chain ID at startup
        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        if chain_id != expected_chain_id {
            anyhow::bail!("Expected chain_id={expected_chain_id}, node reports {chain_id}");
        }

        info!(chain_id, "Connected to Ethereum RPC");

        Ok(Self { provider })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider + Send + Sync> {
        Arc::clone(&self.provider)
    }

    /// Check if the RPC connection is healthy via a lightweight call.
    pub async fn is_healthy(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }
}
