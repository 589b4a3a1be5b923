//! Contract Validator — On-chain Verification at Startup
//!
//! Validates that the configured router, intermediate token and pair
//! tokens point to deployed contracts. The router is critical: without
//! code at that address every quote would fail, so startup aborts.
//! Missing token code only warns.

use std::sync::Arc;

use alloy::primitives::Address;
use alloy::providers::Provider;
use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::domain::route::RouterEndpoint;
use crate::domain::token::TokenRegistry;

/// Result of validating a single contract.
#[derive(Debug)]
struct ValidationResult {
    /// Contract name for logging.
    name: String,
    /// Address that was validated.
    address: Address,
    /// Whether the contract has deployed code.
    has_code: bool,
}

/// Validates contract addresses against on-chain state.
pub struct ContractValidator {
    /// Alloy provider for on-chain queries.
    provider: Arc<dyn Provider + Send + Sync>,
}

impl ContractValidator {
    /// Create a new validator with the given provider.
    pub fn new(provider: Arc<dyn Provider + Send + Sync>) -> Self {
        Self { provider }
    }

    /// Validate the router endpoint and every registered token.
    ///
    /// Returns an error if the router has no code.
    #[instrument(skip_all)]
    pub async fn validate_all(
        &self,
        endpoint: &RouterEndpoint,
        registry: &TokenRegistry,
    ) -> Result<()> {
        let mut targets = vec![
            ("Router".to_string(), endpoint.router),
            ("Intermediate".to_string(), endpoint.intermediate),
        ];
        targets.extend(
            registry
                .tokens()
                .iter()
                .map(|t| (t.symbol.clone(), t.address)),
        );

        let mut results = Vec::with_capacity(targets.len());
        for (name, address) in targets {
            let result = self.validate_contract(name, address).await?;

            if result.has_code {
                info!(
                    contract = %result.name,
                    address = %result.address,
                    "Contract validated: code exists on-chain"
                );
            } else {
                warn!(
                    contract = %result.name,
                    address = %result.address,
                    "Contract has no code, possible misconfiguration"
                );
            }

            results.push(result);
        }

        // Fail hard if the router has no code (critical contract)
        if let Some(router) = results.first() {
            if !router.has_code {
                anyhow::bail!(
                    "Router at {} has no deployed code, cannot proceed",
                    endpoint.router
                );
            }
        }

        info!(validated = results.len(), "All contract validations complete");
        Ok(())
    }

    /// Validate a single contract by checking if code exists at the address.
    async fn validate_contract(&self, name: String, address: Address) -> Result<ValidationResult> {
        let code = self
            .provider
            .get_code_at(address)
            .await
            .with_context(|| format!("Failed to query code for {name}"))?;

        Ok(ValidationResult {
            name,
            address,
            has_code: !code.is_empty(),
        })
    }
}
