//! Logging at forwarded levels without any logger is a configuration error.
//!
//! Nothing in this binary installs a process-wide logger.

use signal_core::{has_logger, global_logger, Signal, SignalError, SignalLevel, TypedSignal};

#[test]
fn test_log_without_logger_fails() {
    assert!(!has_logger());
    assert!(matches!(global_logger(), Err(SignalError::LoggerNotConfigured)));

    let mut s = Signal::new();
    let err = s.log_warning("nobody listening", None).unwrap_err();
    assert!(err.is_configuration());
    assert!(s.is_empty(), "failed log leaves no entry");
    assert_eq!(s.level(), SignalLevel::Information);
}

#[test]
fn test_unforwarded_levels_record_without_logger() {
    let mut s = Signal::new();
    s.log_verbose("detail", None).unwrap();
    s.log_message(SignalLevel::SensitiveInformation, "token refreshed", None)
        .unwrap();
    s.log_message(SignalLevel::Unspecified, "untagged", None).unwrap();

    assert_eq!(s.len(), 3);
    assert_eq!(s.entries()[0].message, "detail");
    assert_eq!(s.level(), SignalLevel::Information);

    // forwarded levels still need a logger
    assert!(s.log_information("visible", None).is_err());
    assert_eq!(s.len(), 3);
}

#[test]
fn test_start_with_propagates() {
    let result = Signal::start_with(SignalLevel::Critical, "boom", None, Vec::<&Signal>::new());
    assert!(matches!(result, Err(SignalError::LoggerNotConfigured)));

    let typed = TypedSignal::<u8>::start_with(
        None,
        SignalLevel::Information,
        "hello",
        None,
        Vec::<&Signal>::new(),
    );
    assert!(typed.is_err());
}

#[test]
fn test_non_logging_operations_work() {
    let mut a = Signal::new();
    let b = Signal::new();
    a.merge([&b]);
    assert!(a.success());
    assert!(a.to_json().unwrap().contains("\"level\":4"));
}
