//! Tests for the process-wide logger slot.
//!
//! All tests in this binary share one installed [`MemoryLogger`].

use signal_core::{
    global_logger, has_logger, install_logger, LogBucket, MemoryLogger, Signal, SignalError,
    SignalLevel, TypedSignal,
};
use std::sync::{Arc, OnceLock};

fn shared_logger() -> Arc<MemoryLogger> {
    static LOGGER: OnceLock<Arc<MemoryLogger>> = OnceLock::new();
    LOGGER
        .get_or_init(|| {
            let logger = Arc::new(MemoryLogger::new());
            install_logger(logger.clone()).expect("first install");
            logger
        })
        .clone()
}

#[test]
fn test_signal_uses_global_logger() {
    let logger = shared_logger();
    assert!(has_logger());

    let mut s = Signal::new();
    s.log_warning("global warning", None).unwrap();

    assert!(logger
        .records()
        .iter()
        .any(|r| r.bucket == LogBucket::Warn && r.message == "global warning"));
}

#[test]
fn test_second_install_rejected() {
    shared_logger();
    let err = install_logger(Arc::new(MemoryLogger::new())).unwrap_err();
    assert!(matches!(err, SignalError::LoggerAlreadyConfigured));
    assert!(global_logger().is_ok());
}

#[test]
fn test_start_with_logs_after_merge() {
    let logger = shared_logger();

    let mut prior = Signal::new();
    prior.log_information("prior step", None).unwrap();

    let s = Signal::start_with(SignalLevel::Critical, "start failed", None, [&prior]).unwrap();
    let messages: Vec<&str> = s.entries().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["prior step", "start failed"]);
    assert!(s.failure());
    assert!(logger.records().iter().any(|r| r.message == "start failed"));
}

#[test]
fn test_typed_start_with() {
    shared_logger();
    let typed = TypedSignal::start_with(
        Some(3usize),
        SignalLevel::Retry,
        "rate limited",
        None,
        Vec::<&Signal>::new(),
    )
    .unwrap();
    assert!(typed.has_value());
    assert_eq!(typed.level(), SignalLevel::Retry);
    assert!(typed.success());
}

#[test]
fn test_injected_logger_wins() {
    let global = shared_logger();
    let local = Arc::new(MemoryLogger::new());
    let mut s = Signal::with_logger(local.clone());
    s.log_information("local only 7f3a", None).unwrap();

    assert_eq!(local.len(), 1);
    assert!(!global.records().iter().any(|r| r.message == "local only 7f3a"));
}
