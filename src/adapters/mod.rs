//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (JSON-RPC, stdout, HTTP endpoints).
//!
//! Adapter categories:
//! - `chain`: Ethereum interaction via alloy-rs
//! - `console`: plain-text quote output
//! - `metrics`: Prometheus metrics export and health checks

pub mod chain;
pub mod console;
pub mod metrics;
