//! Quote Sink Port - Where Resolved Quotes Are Reported
//!
//! The poller emits one line per successful pair and a separator per
//! cycle. Failures are not sent here; they go to the log.

use crate::domain::quote::Quote;

/// Output side of the poller.
pub trait QuoteSink: Send + Sync + 'static {
  /// Report one resolved quote.
  fn quote(&self, quote: &Quote);

  /// Mark the end of a polling cycle.
  fn separator(&self);
}
