//! Severity scale and nature tags for feedback entries.
//!
//! Both enums are encoded as integers on the wire. Only the ordering of
//! [`SignalLevel`] carries meaning; the spacing of the encoding does not.

use serde::{Deserialize, Serialize};

use crate::error::SignalError;
use crate::logger::LogBucket;

/// Ordered severity of a feedback entry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum SignalLevel {
    #[default]
    Unspecified = 0,
    SensitiveInformation = 1,
    VerboseInformation = 2,
    Information = 4,
    Warning = 8,
    Retry = 16,
    Critical = 32,
}

impl SignalLevel {
    /// Every level, lowest first.
    pub const ALL: [SignalLevel; 7] = [
        SignalLevel::Unspecified,
        SignalLevel::SensitiveInformation,
        SignalLevel::VerboseInformation,
        SignalLevel::Information,
        SignalLevel::Warning,
        SignalLevel::Retry,
        SignalLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalLevel::Unspecified => "Unspecified",
            SignalLevel::SensitiveInformation => "SensitiveInformation",
            SignalLevel::VerboseInformation => "VerboseInformation",
            SignalLevel::Information => "Information",
            SignalLevel::Warning => "Warning",
            SignalLevel::Retry => "Retry",
            SignalLevel::Critical => "Critical",
        }
    }

    /// Logger bucket this level is forwarded to, if any.
    pub fn bucket(&self) -> Option<LogBucket> {
        match self {
            SignalLevel::Information => Some(LogBucket::Info),
            SignalLevel::Warning | SignalLevel::Retry => Some(LogBucket::Warn),
            SignalLevel::Critical => Some(LogBucket::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for SignalLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<SignalLevel> for u8 {
    fn from(level: SignalLevel) -> Self {
        level as u8
    }
}

impl TryFrom<u8> for SignalLevel {
    type Error = SignalError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SignalLevel::ALL
            .into_iter()
            .find(|level| *level as u8 == value)
            .ok_or(SignalError::UnknownLevel(value))
    }
}

/// Domain an entry belongs to. Independent of severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum SignalNature {
    #[default]
    Unspecified = 0,
    Code = 1,
    Operations = 2,
    Security = 4,
    Content = 8,
}

impl SignalNature {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalNature::Unspecified => "Unspecified",
            SignalNature::Code => "Code",
            SignalNature::Operations => "Operations",
            SignalNature::Security => "Security",
            SignalNature::Content => "Content",
        }
    }
}

impl std::fmt::Display for SignalNature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<SignalNature> for u8 {
    fn from(nature: SignalNature) -> Self {
        nature as u8
    }
}

impl TryFrom<u8> for SignalNature {
    type Error = SignalError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SignalNature::Unspecified),
            1 => Ok(SignalNature::Code),
            2 => Ok(SignalNature::Operations),
            4 => Ok(SignalNature::Security),
            8 => Ok(SignalNature::Content),
            other => Err(SignalError::UnknownNature(other)),
        }
    }
}
