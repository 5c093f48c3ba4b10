//! Signal carrying a payload.
//!
//! [`TypedSignal`] derefs to [`Signal`], so every logging, merge and
//! threshold operation applies unchanged. Default payloads come from
//! `Default` or from an explicit factory; a failing factory leaves the
//! payload absent and is never reported as an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::{Deref, DerefMut};
use tracing::debug;

use crate::entry::CausingError;
use crate::error::SignalError;
use crate::level::SignalLevel;
use crate::signal::{Signal, SignalView};

/// A [`Signal`] plus an optional result value.
#[derive(Clone)]
pub struct TypedSignal<T> {
    signal: Signal,
    result: Option<T>,
}

impl<T> TypedSignal<T> {
    /// Signal with no payload.
    pub fn empty() -> Self {
        Self {
            signal: Signal::new(),
            result: None,
        }
    }

    /// Payload given explicitly, priors merged.
    pub fn with_result<'a, S, I>(result: Option<T>, priors: I) -> Self
    where
        S: AsRef<Signal> + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        Self {
            signal: Signal::from_priors(priors),
            result,
        }
    }

    /// Payload built by `factory`. An `Err` leaves the payload absent.
    pub fn from_factory<'a, S, I, F, E>(factory: F, priors: I) -> Self
    where
        S: AsRef<Signal> + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
        F: FnOnce() -> Result<T, E>,
        E: std::fmt::Display,
    {
        let result = match factory() {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(target: "signal", "default result not created: {}", e);
                None
            }
        };
        Self::with_result(result, priors)
    }

    /// Typed counterpart of [`Signal::start`].
    pub fn start<'a, S, I>(result: Option<T>, priors: I) -> Self
    where
        S: AsRef<Signal> + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        Self::with_result(result, priors)
    }

    /// Typed counterpart of [`Signal::start_with`].
    pub fn start_with<'a, S, I>(
        result: Option<T>,
        level: SignalLevel,
        message: impl Into<String>,
        error: Option<CausingError>,
        priors: I,
    ) -> Result<Self, SignalError>
    where
        S: AsRef<Signal> + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        let mut typed = Self::with_result(result, priors);
        typed.signal.log_message(level, message, error)?;
        Ok(typed)
    }

    /// Attach a payload to an existing signal.
    pub fn from_signal(signal: Signal, result: Option<T>) -> Self {
        Self { signal, result }
    }

    pub fn has_value(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn result_mut(&mut self) -> Option<&mut T> {
        self.result.as_mut()
    }

    pub fn set_result(&mut self, result: T) {
        self.result = Some(result);
    }

    pub fn take_result(&mut self) -> Option<T> {
        self.result.take()
    }

    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    pub fn into_parts(self) -> (Option<T>, Signal) {
        (self.result, self.signal)
    }
}

impl<T: Default> TypedSignal<T> {
    /// Signal with `T::default()` as payload.
    pub fn new() -> Self {
        Self {
            signal: Signal::new(),
            result: Some(T::default()),
        }
    }

    /// Priors merged; payload defaulted only when `create_default` is set.
    pub fn from_priors<'a, S, I>(create_default: bool, priors: I) -> Self
    where
        S: AsRef<Signal> + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        let result = create_default.then(T::default);
        Self::with_result(result, priors)
    }
}

impl<T: Default> Default for TypedSignal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for TypedSignal<T> {
    type Target = Signal;

    fn deref(&self) -> &Signal {
        &self.signal
    }
}

impl<T> DerefMut for TypedSignal<T> {
    fn deref_mut(&mut self) -> &mut Signal {
        &mut self.signal
    }
}

impl<T> AsRef<Signal> for TypedSignal<T> {
    fn as_ref(&self) -> &Signal {
        &self.signal
    }
}

impl<T> From<TypedSignal<T>> for Signal {
    fn from(typed: TypedSignal<T>) -> Self {
        typed.signal
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for TypedSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedSignal")
            .field("signal", &self.signal)
            .field("result", &self.result)
            .finish()
    }
}

impl<T: PartialEq> PartialEq for TypedSignal<T> {
    fn eq(&self, other: &Self) -> bool {
        self.signal == other.signal && self.result == other.result
    }
}

// ============================================================================
// Serialization
// ============================================================================

#[derive(Serialize)]
struct TypedSignalView<'a, T> {
    #[serde(flatten)]
    signal: SignalView<'a>,
    result: Option<&'a T>,
}

#[derive(Deserialize)]
struct TypedSignalRecord<T> {
    #[serde(flatten)]
    signal: Signal,
    result: Option<T>,
}

impl<T: Serialize> Serialize for TypedSignal<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TypedSignalView {
            signal: SignalView::from(&self.signal),
            result: self.result.as_ref(),
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TypedSignal<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = TypedSignalRecord::<T>::deserialize(deserializer)?;
        Ok(Self {
            signal: record.signal,
            result: record.result,
        })
    }
}

impl<T: Serialize> TypedSignal<T> {
    pub fn to_json(&self) -> Result<String, SignalError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SignalError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<T: DeserializeOwned> TypedSignal<T> {
    pub fn from_json(json: &str) -> Result<Self, SignalError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::MemoryLogger;
    use std::sync::Arc;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Report {
        rows: u32,
        name: String,
    }

    #[test]
    fn test_new_uses_default() {
        let typed: TypedSignal<Report> = TypedSignal::new();
        assert!(typed.has_value());
        assert_eq!(typed.result(), Some(&Report::default()));
        assert_eq!(typed.level(), SignalLevel::Information);
    }

    #[test]
    fn test_factory_failure_is_swallowed() {
        let typed: TypedSignal<Report> =
            TypedSignal::from_factory(|| Err::<Report, _>("no template"), Vec::<&Signal>::new());
        assert!(!typed.has_value());
        assert!(typed.is_empty());
        assert!(typed.success());
    }

    #[test]
    fn test_from_priors_flag() {
        let logger = Arc::new(MemoryLogger::new());
        let mut prior = Signal::with_logger(logger);
        prior.log_warning("stale cache", None).unwrap();

        let with: TypedSignal<Report> = TypedSignal::from_priors(true, [&prior]);
        let without: TypedSignal<Report> = TypedSignal::from_priors(false, [&prior]);
        assert!(with.has_value());
        assert!(!without.has_value());
        assert_eq!(without.level(), SignalLevel::Warning);
        assert_eq!(without.len(), 1);
    }

    #[test]
    fn test_deref_logging_and_merge() {
        let logger = Arc::new(MemoryLogger::new());
        let mut typed = TypedSignal::from_signal(Signal::with_logger(logger.clone()), Some(7u32));
        typed.log_critical("parse failed", None).unwrap();

        let mut outer = Signal::new();
        assert!(outer.merge_and_check_failure([&typed]));
        assert_eq!(logger.len(), 1);
        assert_eq!(typed.result(), Some(&7));
    }

    #[test]
    fn test_has_value_is_not_severity() {
        let logger = Arc::new(MemoryLogger::new());
        let mut typed = TypedSignal::from_signal(Signal::with_logger(logger), Some(Report::default()));
        typed.log_critical("broken", None).unwrap();
        assert!(typed.has_value());
        assert!(typed.failure());
        assert_eq!(typed.take_result(), Some(Report::default()));
        assert!(!typed.has_value());
    }

    #[test]
    fn test_json_result_field() {
        let typed = TypedSignal::with_result(
            Some(Report {
                rows: 3,
                name: "daily".to_string(),
            }),
            Vec::<&Signal>::new(),
        );
        let value: serde_json::Value = serde_json::from_str(&typed.to_json().unwrap()).unwrap();
        assert_eq!(value["result"]["rows"], 3);
        assert_eq!(value["level_name"], "Information");

        let empty: TypedSignal<Report> = TypedSignal::empty();
        let value: serde_json::Value = serde_json::from_str(&empty.to_json().unwrap()).unwrap();
        assert!(value["result"].is_null());
    }
}
