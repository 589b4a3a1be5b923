//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `RouterQuoter`: read-only `getAmountsOut` queries
//! - `QuoteSink`: reporting of resolved quotes

pub mod router;
pub mod sink;

pub use router::{QuoteError, RouterQuoter};
pub use sink::QuoteSink;
