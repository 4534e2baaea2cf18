//! Injected diagnostic log.
//!
//! Persistence failures that do not abort an operation (a missing fragment
//! file, a directory that could not be created) are recorded here instead
//! of being returned. The store owns its log, so tests can hand it a
//! [`MemoryLog`] and inspect what was recorded.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::ConfigError;

/// How serious a recorded failure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation carried on (e.g. one fragment fell back to empty).
    Warning,
    /// The operation was abandoned.
    Error,
}

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub severity: Severity,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl LogEntry {
    pub fn from_error(severity: Severity, error: &ConfigError) -> Self {
        Self {
            severity,
            message: error.user_message(),
            path: error.path().map(std::path::Path::to_path_buf),
        }
    }
}

/// Sink for persistence diagnostics.
pub trait DiagnosticLog {
    fn record(&self, entry: LogEntry);
}

impl<T: DiagnosticLog + ?Sized> DiagnosticLog for &T {
    fn record(&self, entry: LogEntry) {
        (**self).record(entry);
    }
}

impl<T: DiagnosticLog + ?Sized> DiagnosticLog for Arc<T> {
    fn record(&self, entry: LogEntry) {
        (**self).record(entry);
    }
}

/// Forwards every entry to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl DiagnosticLog for TracingLog {
    fn record(&self, entry: LogEntry) {
        let path = entry
            .path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match entry.severity {
            Severity::Warning => tracing::warn!(path = %path, "{}", entry.message),
            Severity::Error => tracing::error!(path = %path, "{}", entry.message),
        }
    }
}

/// Keeps entries in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DiagnosticLog for MemoryLog {
    fn record(&self, entry: LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}
