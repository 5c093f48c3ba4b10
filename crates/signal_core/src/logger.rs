//! Logger capability signals forward their entries to.
//!
//! A signal either carries its own logger or falls back to the
//! process-wide slot. The slot is set once with [`install_logger`]; reading
//! it before that is a configuration error.
//!
//! ## Usage
//!
//! ```ignore
//! use signal_core::logger::init_tracing_logger;
//!
//! init_tracing_logger()?;
//! let mut signal = Signal::new();
//! signal.log_warning("disk low", None)?;
//! ```

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{error, info, warn};

use crate::error::SignalError;

/// Borrowed causing error passed to a logger.
pub type ErrorRef<'a> = &'a (dyn std::error::Error + Send + Sync + 'static);

/// Severity buckets understood by loggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogBucket {
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogBucket::Info => "info",
            LogBucket::Warn => "warn",
            LogBucket::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Sink for forwarded entries.
///
/// Implementations may block or hand the record off; signals never wait on
/// anything beyond the call itself.
pub trait SignalLogger: Send + Sync {
    fn log(&self, bucket: LogBucket, message: &str, error: Option<ErrorRef<'_>>);
}

// ============================================================================
// Process-wide slot
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<dyn SignalLogger>> = OnceLock::new();

/// Install the process-wide logger. Fails if one is already installed.
pub fn install_logger(logger: Arc<dyn SignalLogger>) -> Result<(), SignalError> {
    GLOBAL_LOGGER
        .set(logger)
        .map_err(|_| SignalError::LoggerAlreadyConfigured)
}

/// Install a [`TracingLogger`] as the process-wide logger.
pub fn init_tracing_logger() -> Result<(), SignalError> {
    install_logger(Arc::new(TracingLogger))
}

/// Whether a process-wide logger has been installed.
pub fn has_logger() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// The process-wide logger.
pub fn global_logger() -> Result<Arc<dyn SignalLogger>, SignalError> {
    GLOBAL_LOGGER
        .get()
        .cloned()
        .ok_or(SignalError::LoggerNotConfigured)
}

// ============================================================================
// Implementations
// ============================================================================

/// Forwards to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl SignalLogger for TracingLogger {
    fn log(&self, bucket: LogBucket, message: &str, error: Option<ErrorRef<'_>>) {
        match (bucket, error) {
            (LogBucket::Info, _) => info!(target: "signal", "{}", message),
            (LogBucket::Warn, _) => warn!(target: "signal", "{}", message),
            (LogBucket::Error, Some(e)) => error!(target: "signal", error = %e, "{}", message),
            (LogBucket::Error, None) => error!(target: "signal", "{}", message),
        }
    }
}

/// One call received by a [`MemoryLogger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedRecord {
    pub bucket: LogBucket,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Keeps every forwarded call in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LoggedRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records received so far.
    pub fn records(&self) -> Vec<LoggedRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SignalLogger for MemoryLogger {
    fn log(&self, bucket: LogBucket, message: &str, error: Option<ErrorRef<'_>>) {
        let record = LoggedRecord {
            bucket,
            message: message.to_string(),
            error: error.map(|e| e.to_string()),
        };
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}
