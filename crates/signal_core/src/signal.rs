//! Signal: the outcome of one logical operation.
//!
//! A signal carries an ordered audit trail of [`FeedbackEntry`] values and
//! the worst level seen among them. Operations return signals, callers
//! merge them into their own and read `success()` / `failure()` to decide
//! what to do next. Nothing here raises for ordinary operational failure.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::sync::Arc;

use crate::entry::{error_suffix, CausingError, FeedbackEntry};
use crate::error::SignalError;
use crate::level::SignalLevel;
use crate::logger::{global_logger, LogBucket, SignalLogger};

/// Highest level still counted as success.
pub const SUCCESS_LEVEL: SignalLevel = SignalLevel::Retry;

/// Level at which a signal has failed under default thresholds.
pub const FAILURE_LEVEL: SignalLevel = SignalLevel::Critical;

/// Level of a signal with no entries.
pub const EMPTY_LEVEL: SignalLevel = SignalLevel::Information;

/// Accumulated feedback for one operation.
#[derive(Clone)]
pub struct Signal {
    level: SignalLevel,
    entries: Vec<FeedbackEntry>,
    logger: Option<Arc<dyn SignalLogger>>,
}

impl Signal {
    pub fn new() -> Self {
        Self {
            level: EMPTY_LEVEL,
            entries: Vec::new(),
            logger: None,
        }
    }

    /// Signal that forwards to `logger` instead of the process-wide one.
    pub fn with_logger(logger: Arc<dyn SignalLogger>) -> Self {
        Self {
            logger: Some(logger),
            ..Self::new()
        }
    }

    /// New signal seeded from prior results.
    pub fn from_priors<'a, S, I>(priors: I) -> Self
    where
        S: AsRef<Signal> + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        let mut signal = Self::new();
        signal.merge(priors);
        signal
    }

    /// Begin an operation, optionally importing one prior result.
    pub fn start(prior: Option<&Signal>) -> Self {
        Self::from_priors(prior)
    }

    /// Begin an operation and record its outcome in one call.
    ///
    /// Priors are merged before the message is logged.
    pub fn start_with<'a, S, I>(
        level: SignalLevel,
        message: impl Into<String>,
        error: Option<CausingError>,
        priors: I,
    ) -> Result<Self, SignalError>
    where
        S: AsRef<Signal> + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        let mut signal = Self::from_priors(priors);
        signal.log_message(level, message, error)?;
        Ok(signal)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn level(&self) -> SignalLevel {
        self.level
    }

    pub fn level_name(&self) -> &'static str {
        self.level.as_str()
    }

    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explicitly attached logger, if any.
    pub fn logger(&self) -> Option<&Arc<dyn SignalLogger>> {
        self.logger.as_ref()
    }

    pub fn set_logger(&mut self, logger: Arc<dyn SignalLogger>) {
        self.logger = Some(logger);
    }

    // ========================================================================
    // Logging
    // ========================================================================

    pub fn log_information(
        &mut self,
        message: impl Into<String>,
        error: Option<CausingError>,
    ) -> Result<&mut FeedbackEntry, SignalError> {
        self.log_message(SignalLevel::Information, message, error)
    }

    pub fn log_verbose(
        &mut self,
        message: impl Into<String>,
        error: Option<CausingError>,
    ) -> Result<&mut FeedbackEntry, SignalError> {
        self.log_message(SignalLevel::VerboseInformation, message, error)
    }

    pub fn log_warning(
        &mut self,
        message: impl Into<String>,
        error: Option<CausingError>,
    ) -> Result<&mut FeedbackEntry, SignalError> {
        self.log_message(SignalLevel::Warning, message, error)
    }

    pub fn log_retry(
        &mut self,
        message: impl Into<String>,
        error: Option<CausingError>,
    ) -> Result<&mut FeedbackEntry, SignalError> {
        self.log_message(SignalLevel::Retry, message, error)
    }

    pub fn log_critical(
        &mut self,
        message: impl Into<String>,
        error: Option<CausingError>,
    ) -> Result<&mut FeedbackEntry, SignalError> {
        self.log_message(SignalLevel::Critical, message, error)
    }

    /// Record a message at `level`, forward it and promote the signal level.
    pub fn log_message(
        &mut self,
        level: SignalLevel,
        message: impl Into<String>,
        error: Option<CausingError>,
    ) -> Result<&mut FeedbackEntry, SignalError> {
        self.log_entry(FeedbackEntry::new(level, message).with_error(error))
    }

    /// Record a pre-built entry through the same path as [`Self::log_message`].
    ///
    /// Levels without a log bucket are recorded without a logger. For the
    /// others, fails without touching the signal when no logger resolves.
    pub fn log_entry(&mut self, entry: FeedbackEntry) -> Result<&mut FeedbackEntry, SignalError> {
        if let Some(bucket) = entry.level.bucket() {
            let logger = self.resolve_logger()?;
            forward(logger.as_ref(), bucket, &entry);
        }
        self.promote_level(entry.level);

        let index = self.entries.len();
        self.entries.push(entry);
        Ok(&mut self.entries[index])
    }

    fn resolve_logger(&self) -> Result<Arc<dyn SignalLogger>, SignalError> {
        match &self.logger {
            Some(logger) => Ok(Arc::clone(logger)),
            None => global_logger(),
        }
    }

    // ========================================================================
    // Level algebra
    // ========================================================================

    /// `level := max(level, level_seen)`.
    pub fn promote_level(&mut self, level_seen: SignalLevel) -> SignalLevel {
        if level_seen > self.level {
            self.level = level_seen;
        }
        self.level
    }

    /// Rebuild the level from the entries; [`EMPTY_LEVEL`] when there are none.
    pub fn recompute_level(&mut self) -> SignalLevel {
        self.level = self
            .entries
            .iter()
            .map(|e| e.level)
            .max()
            .unwrap_or(EMPTY_LEVEL);
        self.level
    }

    /// Append entries without forwarding them, then recompute the level.
    pub fn extend_entries<I>(&mut self, entries: I) -> SignalLevel
    where
        I: IntoIterator<Item = FeedbackEntry>,
    {
        self.entries.extend(entries);
        self.recompute_level()
    }

    /// Copy the entries of each prior signal, in order, into this one.
    ///
    /// Priors with no entries are skipped and leave the level untouched.
    /// Sources are not modified.
    pub fn merge<'a, S, I>(&mut self, priors: I) -> &mut Self
    where
        S: AsRef<Signal> + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        for prior in priors {
            let prior = prior.as_ref();
            if !prior.entries.is_empty() {
                self.extend_entries(prior.entries.iter().cloned());
            }
        }
        self
    }

    /// Merge, then report [`Self::failure`].
    pub fn merge_and_check_failure<'a, S, I>(&mut self, priors: I) -> bool
    where
        S: AsRef<Signal> + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        self.merge(priors).failure()
    }

    /// Merge, then report [`Self::success`].
    pub fn merge_and_check_success<'a, S, I>(&mut self, priors: I) -> bool
    where
        S: AsRef<Signal> + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        self.merge(priors).success()
    }

    // ========================================================================
    // Thresholds
    // ========================================================================

    /// `level > passing`, or `level == passing` when `allow_equals`.
    pub fn check_failure(&self, allow_equals: bool, passing: SignalLevel) -> bool {
        self.level > passing || (allow_equals && self.level == passing)
    }

    /// `level < passing`, or `level == passing` when `allow_equals`.
    ///
    /// Not the complement of [`Self::check_failure`] for arbitrary arguments.
    pub fn check_success(&self, allow_equals: bool, passing: SignalLevel) -> bool {
        self.level < passing || (allow_equals && self.level == passing)
    }

    /// Strictly above [`SUCCESS_LEVEL`].
    pub fn failure(&self) -> bool {
        self.check_failure(false, SUCCESS_LEVEL)
    }

    /// At or below [`SUCCESS_LEVEL`].
    pub fn success(&self) -> bool {
        self.check_success(true, SUCCESS_LEVEL)
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Formatted entries at or above `minimum`, in insertion order.
    ///
    /// Lazy; call again to restart.
    pub fn feedback_entries(&self, minimum: SignalLevel) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.level >= minimum)
            .map(FeedbackEntry::formatted)
    }

    pub fn entry_messages(&self) -> impl Iterator<Item = String> + '_ {
        self.feedback_entries(SignalLevel::Unspecified)
    }

    pub fn critical_entry_messages(&self) -> impl Iterator<Item = String> + '_ {
        self.feedback_entries(FAILURE_LEVEL)
    }

    /// Entries whose level is exactly critical.
    pub fn critical_entries(&self) -> impl Iterator<Item = &FeedbackEntry> + '_ {
        self.entries.iter().filter(|e| e.level == FAILURE_LEVEL)
    }

    /// Comma-joined messages of entries at or above critical.
    pub fn critical_summary(&self) -> String {
        self.entries
            .iter()
            .filter(|e| e.level >= FAILURE_LEVEL)
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `" - <message>"` for an error, empty otherwise.
    pub fn error_message(error: Option<&CausingError>) -> String {
        error_suffix(error.map(|e| &**e))
    }

    /// First entry for each [`crate::EntryKey`], in insertion order.
    pub fn distinct_entries(&self) -> Vec<&FeedbackEntry> {
        let mut seen = HashSet::new();
        self.entries.iter().filter(|e| seen.insert(e.key())).collect()
    }

    // ========================================================================
    // JSON
    // ========================================================================

    pub fn to_json(&self) -> Result<String, SignalError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SignalError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SignalError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Restore a signal from stored parts, trusting the stored level.
    pub(crate) fn from_stored(level: SignalLevel, entries: Vec<FeedbackEntry>) -> Self {
        Self {
            level,
            entries,
            logger: None,
        }
    }
}

fn forward(logger: &dyn SignalLogger, bucket: LogBucket, entry: &FeedbackEntry) {
    match entry.level {
        SignalLevel::Retry => logger.log(bucket, &format!("Retry: {}", entry.message), None),
        SignalLevel::Critical => logger.log(bucket, &entry.message, entry.error.as_deref()),
        _ => logger.log(bucket, &entry.message, None),
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Signal> for Signal {
    fn as_ref(&self) -> &Signal {
        self
    }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("level", &self.level)
            .field("entries", &self.entries)
            .field("has_logger", &self.logger.is_some())
            .finish()
    }
}

// Loggers are process-local and excluded from equality.
impl PartialEq for Signal {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level && self.entries == other.entries
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} entries)", self.level, self.entries.len())?;
        let summary = self.critical_summary();
        if !summary.is_empty() {
            write!(f, ": {}", summary)?;
        }
        Ok(())
    }
}

// ============================================================================
// Serialization
// ============================================================================

#[derive(Serialize)]
pub(crate) struct SignalView<'a> {
    pub level: SignalLevel,
    pub level_name: &'static str,
    pub critical_summary: String,
    pub entries: &'a [FeedbackEntry],
}

impl<'a> From<&'a Signal> for SignalView<'a> {
    fn from(signal: &'a Signal) -> Self {
        Self {
            level: signal.level,
            level_name: signal.level_name(),
            critical_summary: signal.critical_summary(),
            entries: &signal.entries,
        }
    }
}

/// Stored form. Output-only fields are ignored on read.
#[derive(Deserialize)]
pub(crate) struct SignalRecord {
    #[serde(default = "default_level")]
    pub level: SignalLevel,
    #[serde(default)]
    pub entries: Vec<FeedbackEntry>,
}

fn default_level() -> SignalLevel {
    EMPTY_LEVEL
}

impl From<SignalRecord> for Signal {
    fn from(record: SignalRecord) -> Self {
        Signal::from_stored(record.level, record.entries)
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SignalView::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Signal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        SignalRecord::deserialize(deserializer).map(Signal::from)
    }
}
