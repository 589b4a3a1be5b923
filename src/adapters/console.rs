//! Console Sink - Plain-text Quote Output
//!
//! Writes `USDT => USDC : 0.99` lines and a separator per cycle to
//! stdout (or any writer). Kept apart from the JSON log stream so the
//! ticker output stays human-readable.

use std::io::Write;
use std::sync::Mutex;

use tracing::warn;

use crate::domain::quote::Quote;
use crate::ports::sink::QuoteSink;

/// Line-oriented quote sink.
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
    separator: String,
}

impl ConsoleSink {
    /// Sink over an arbitrary writer.
    pub fn new(out: Box<dyn Write + Send>, separator: impl Into<String>) -> Self {
        Self {
            out: Mutex::new(out),
            separator: separator.into(),
        }
    }

    /// Sink over the process stdout.
    pub fn stdout(separator: impl Into<String>) -> Self {
        Self::new(Box::new(std::io::stdout()), separator)
    }

    fn write_line(&self, line: &str) {
        // A poisoned lock only means another writer panicked mid-line.
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!(error = %e, "Failed to write ticker output");
        }
    }
}

impl QuoteSink for ConsoleSink {
    fn quote(&self, quote: &Quote) {
        self.write_line(&quote.to_string());
    }

    fn separator(&self) {
        self.write_line(&self.separator);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy::primitives::U256;
    use chrono::Utc;

    use super::*;
    use crate::domain::token::{Pair, Token};

    /// Cloneable in-memory writer.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_quote_then_separator() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::new(Box::new(buf.clone()), "-----");

        sink.quote(&Quote {
            pair: Pair::new(Token::usdc(), Token::usdt()),
            amount_in: U256::from(1_000_000u64),
            amount_out: U256::from(1_002_500u64),
            price: "1.0025".to_string(),
            observed_at: Utc::now(),
        });
        sink.separator();

        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "USDC => USDT : 1.0025\n-----\n");
    }
}
