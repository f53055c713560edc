//! Injectable logging for the loader and its background poller.
//!
//! The loader never logs through a global; it is handed a [`Logger`] at
//! construction. [`TracingLogger`] is the default and forwards to `tracing`.

use parking_lot::Mutex;
use std::fmt;

/// Severity of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Routine detail, e.g. an unchanged poll.
    Debug,
    /// Lifecycle and change events.
    Info,
    /// Recoverable oddities.
    Warn,
    /// Failures that were tolerated.
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Sink for leveled log messages.
pub trait Logger: Send + Sync {
    /// Record `message` at `level`.
    fn log(&self, level: Level, message: &str);
}

/// Logger that emits `tracing` events with `source = "config"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Debug => tracing::debug!(target: "gateway_config", source = "config", "{}", message),
            Level::Info => tracing::info!(target: "gateway_config", source = "config", "{}", message),
            Level::Warn => tracing::warn!(target: "gateway_config", source = "config", "{}", message),
            Level::Error => tracing::error!(target: "gateway_config", source = "config", "{}", message),
        }
    }
}

/// Logger that keeps every record in memory.
///
/// Useful as a test double when asserting on what the poller reported.
///
/// # Examples
///
/// ```rust
/// use gateway_config::logging::{Level, Logger, RecordingLogger};
///
/// let logger = RecordingLogger::new();
/// logger.log(Level::Error, "watch config file error");
/// assert!(logger.contains(Level::Error, "watch config"));
/// ```
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    /// Create an empty recording logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far, oldest first.
    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.lock().clone()
    }

    /// Number of records at exactly `level`.
    pub fn count(&self, level: Level) -> usize {
        self.records.lock().iter().filter(|(l, _)| *l == level).count()
    }

    /// Whether any record at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: Level, message: &str) {
        self.records.lock().push((level, message.to_string()));
    }
}
