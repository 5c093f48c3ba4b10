//! Feedback entries recorded on a signal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::level::{SignalLevel, SignalNature};

/// Opaque error attached to an entry. Process-local, never serialized.
pub type CausingError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Single diagnostic fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_full: Option<String>,
    pub level: SignalLevel,
    #[serde(default)]
    pub nature: SignalNature,
    #[serde(skip)]
    pub error: Option<CausingError>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(default)]
    pub version: Uuid,
    #[serde(default)]
    pub read_only: bool,
}

impl FeedbackEntry {
    pub fn new(level: SignalLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            message_full: None,
            level,
            nature: SignalNature::Unspecified,
            error: None,
            created_at: Utc::now(),
            last_modified_at: None,
            created_by: None,
            last_modified_by: None,
            version: Uuid::nil(),
            read_only: false,
        }
    }

    pub fn with_nature(mut self, nature: SignalNature) -> Self {
        self.nature = nature;
        self
    }

    pub fn with_error(mut self, error: Option<CausingError>) -> Self {
        self.error = error;
        self
    }

    pub fn with_message_full(mut self, message_full: impl Into<String>) -> Self {
        self.message_full = Some(message_full.into());
        self
    }

    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    /// Stamp the modification audit fields.
    pub fn touch(&mut self, modified_by: impl Into<String>) {
        self.last_modified_at = Some(Utc::now());
        self.last_modified_by = Some(modified_by.into());
    }

    /// Message of the causing error, if one is attached.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    /// `<Level>message - error` form used by the signal's text views.
    pub fn formatted(&self) -> String {
        format!(
            "<{}>{}{}",
            self.level,
            self.message,
            error_suffix(self.error.as_deref())
        )
    }

    /// Identity used for deduplication.
    pub fn key(&self) -> EntryKey {
        EntryKey {
            created_at: self.created_at,
            message: self.message.clone(),
            nature: self.nature,
        }
    }
}

/// `" - <message>"` for an error, empty otherwise.
pub fn error_suffix(error: Option<&(dyn std::error::Error + Send + Sync + 'static)>) -> String {
    match error {
        Some(e) => format!(" - {}", e),
        None => String::new(),
    }
}

// Causing errors are transient and excluded from equality.
impl PartialEq for FeedbackEntry {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.message_full == other.message_full
            && self.level == other.level
            && self.nature == other.nature
            && self.created_at == other.created_at
            && self.last_modified_at == other.last_modified_at
            && self.created_by == other.created_by
            && self.last_modified_by == other.last_modified_by
            && self.version == other.version
            && self.read_only == other.read_only
    }
}

/// Creation time, message and nature of an entry.
///
/// Two entries with the same key are treated as the same fact when
/// collecting into hash-based sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub created_at: DateTime<Utc>,
    pub message: String,
    pub nature: SignalNature,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io;

    fn disk_error() -> CausingError {
        Arc::new(io::Error::new(io::ErrorKind::Other, "no space left on device"))
    }

    #[test]
    fn test_entry_new_defaults() {
        let before = Utc::now();
        let entry = FeedbackEntry::new(SignalLevel::Warning, "disk low");
        assert_eq!(entry.message, "disk low");
        assert_eq!(entry.level, SignalLevel::Warning);
        assert_eq!(entry.nature, SignalNature::Unspecified);
        assert!(entry.error.is_none());
        assert!(entry.created_at >= before);
        assert!(entry.last_modified_at.is_none());
        assert!(entry.created_by.is_none());
        assert_eq!(entry.version, Uuid::nil());
        assert!(!entry.read_only);
    }

    #[test]
    fn test_empty_message_is_legal() {
        let entry = FeedbackEntry::new(SignalLevel::Information, "");
        assert_eq!(entry.formatted(), "<Information>");
    }

    #[test]
    fn test_formatted_with_error() {
        let entry = FeedbackEntry::new(SignalLevel::Critical, "disk full")
            .with_error(Some(disk_error()));
        assert_eq!(entry.formatted(), "<Critical>disk full - no space left on device");
        assert_eq!(entry.error_message().as_deref(), Some("no space left on device"));
    }

    #[test]
    fn test_error_not_serialized() {
        let entry = FeedbackEntry::new(SignalLevel::Critical, "disk full")
            .with_nature(SignalNature::Operations)
            .with_error(Some(disk_error()));
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("no space left"));

        let parsed: FeedbackEntry = serde_json::from_str(&json).unwrap();
        assert!(parsed.error.is_none());
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_touch_keeps_level_and_message() {
        let mut entry = FeedbackEntry::new(SignalLevel::Retry, "upstream busy").with_created_by("fetcher");
        entry.touch("scheduler");
        assert_eq!(entry.level, SignalLevel::Retry);
        assert_eq!(entry.message, "upstream busy");
        assert_eq!(entry.last_modified_by.as_deref(), Some("scheduler"));
        assert!(entry.last_modified_at.is_some());
    }

    #[test]
    fn test_key_dedup() {
        let first = FeedbackEntry::new(SignalLevel::Warning, "disk low");
        let copy = first.clone().with_message_full("87% used");
        let other = FeedbackEntry::new(SignalLevel::Warning, "disk low").with_nature(SignalNature::Content);

        let keys: HashSet<EntryKey> = [&first, &copy, &other].iter().map(|e| e.key()).collect();
        assert_eq!(keys.len(), 2);
    }
}
