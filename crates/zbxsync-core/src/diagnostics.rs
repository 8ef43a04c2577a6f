//! Advisory diagnostics emitted while building a host spec.
//!
//! The only diagnostic today is the deprecation warning for the legacy
//! `group` field. It has no fixed delivery channel: callers inject a sink,
//! and the default sink forwards to `tracing`.

use std::cell::RefCell;

use tracing::warn;

/// Receiver for advisory, non-fatal diagnostics.
///
/// Sinks must not affect control flow; construction continues regardless of
/// what a sink does with the message.
pub trait DiagnosticSink {
    /// Deliver one advisory warning.
    fn warn(&self, message: &str);
}

/// Default sink: emits a structured warning through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, message: &str) {
        warn!(detail = %message, "host spec advisory");
    }
}

/// Sink that collects warnings in memory.
///
/// Useful for callers that surface advisories out-of-band, e.g. in a catalog
/// compile report, and for asserting on emitted warnings in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: RefCell<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the warnings collected so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
