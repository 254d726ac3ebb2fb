//! Injected diagnostic sink for non-fatal engine reports.
//!
//! The diff engine never fails on malformed input; inconsistencies degrade
//! to "skip and report" through the sink injected at construction. The
//! default sink discards everything, [`TracingSink`] forwards to the logging
//! facility, and [`MemorySink`] captures messages for test assertions.

use std::sync::{Arc, Mutex};

/// Receiver for non-fatal diagnostic messages.
///
/// `report` is fire-and-forget: implementations must not panic and must not
/// abort the caller. Thread-safety of a shared sink is the implementation's
/// own responsibility.
pub trait DiagnosticSink {
    fn report(&self, message: &str);
}

/// Default sink that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&self, _message: &str) {}
}

/// Sink that forwards reports to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, message: &str) {
        tracing::warn!(component = module_path!(), "{}", message);
    }
}

/// Sink that captures reports in memory for deterministic test assertions.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured messages, in report order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Discard all captured messages.
    pub fn clear(&self) {
        self.messages.lock().map(|mut m| m.clear()).ok();
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, message: &str) {
        self.messages
            .lock()
            .map(|mut m| m.push(message.to_string()))
            .ok();
    }
}
