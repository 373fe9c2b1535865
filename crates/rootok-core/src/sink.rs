//! # Diagnostic Sinks
//!
//! The host framework owns the logging channel. The core only writes to it
//! through [`DiagnosticSink`] and never reads anything back.
//!
//! - [`NullSink`] drops everything.
//! - [`MemorySink`] records entries for tests and tooling.
//! - [`TracingSink`] forwards entries into `tracing`.

use crate::primitives::MODULE_NAME;
use crate::types::Severity;
use std::sync::{Mutex, PoisonError};

/// Write-only logging channel supplied by the host for one call.
pub trait DiagnosticSink {
    /// Record one diagnostic line.
    fn log(&self, severity: Severity, message: &str);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &T {
    fn log(&self, severity: Severity, message: &str) {
        (**self).log(severity, message);
    }
}

// =============================================================================
// NULL SINK
// =============================================================================

/// Discards every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn log(&self, _severity: Severity, _message: &str) {}
}

// =============================================================================
// MEMORY SINK
// =============================================================================

/// One recorded diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Severity the line was written at.
    pub severity: Severity,
    /// Message text.
    pub message: String,
}

/// Records entries in call order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of entries logged at `severity`.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.severity == severity)
            .count()
    }

    /// Whether nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn log(&self, severity: Severity, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry {
                severity,
                message: message.to_owned(),
            });
    }
}

// =============================================================================
// TRACING SINK
// =============================================================================

/// Forwards module diagnostics into the `tracing` ecosystem.
///
/// Used when the module logic runs outside a PAM host, e.g. in the probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => tracing::error!(module = MODULE_NAME, "{}", message),
            Severity::Debug => tracing::debug!(module = MODULE_NAME, "{}", message),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
