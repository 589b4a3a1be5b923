//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces.
//!
//! Use cases:
//! - `QuotePoller`: fixed-delay router quote loop

pub mod quote_poller;

pub use quote_poller::{CycleReport, PairFailure, PollerSettings, QuotePoller};
