//! Error types for signal_core.
//!
//! Operation outcomes (warnings, retries, critical failures) are never
//! errors here; they are entries on a [`crate::Signal`]. This enum only
//! covers programming and decoding errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Logger must be initialized before a signal can log.")]
    LoggerNotConfigured,

    #[error("Logger is already initialized.")]
    LoggerAlreadyConfigured,

    #[error("Unknown signal level: {0}")]
    UnknownLevel(u8),

    #[error("Unknown signal nature: {0}")]
    UnknownNature(u8),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SignalError {
    /// True for errors caused by missing or double logger setup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SignalError::LoggerNotConfigured | SignalError::LoggerAlreadyConfigured
        )
    }
}
