//! Deterministic scenarios: staged operations whose signals are merged.
//!
//! Each stage returns its own signal; the runner merges them in order the
//! way a caller of real operations would, stopping once a stage fails.

use serde::Serialize;
use signal_core::{
    CausingError, FeedbackEntry, Signal, SignalError, SignalLevel, SignalLogger, SignalNature,
    TypedSignal,
};
use std::io;
use std::sync::Arc;
use tracing::debug;

/// Names accepted by [`run_scenario`].
pub const SCENARIOS: [&str; 4] = ["healthy", "disk-pressure", "retry-storm", "missing-payload"];

/// Outcome of one scenario run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub scenario: String,
    pub stages_run: usize,
    pub stages_planned: usize,
    pub success: bool,
    pub failure: bool,
    pub payload: Option<DiskUsage>,
    pub entries: Vec<String>,
    pub signal: Signal,
}

/// Disk usage payload produced by the probe stage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiskUsage {
    pub mount: String,
    pub used_percent: u8,
}

type Stage = fn(&Arc<dyn SignalLogger>) -> Result<Signal, SignalError>;

fn stage_signal(logger: &Arc<dyn SignalLogger>) -> Signal {
    Signal::with_logger(Arc::clone(logger))
}

fn io_error(kind: io::ErrorKind, msg: &str) -> CausingError {
    Arc::new(io::Error::new(kind, msg.to_string()))
}

// ============================================================================
// Stages
// ============================================================================

fn probe_ok(logger: &Arc<dyn SignalLogger>) -> Result<Signal, SignalError> {
    let mut s = stage_signal(logger);
    s.log_information("probe: 3 mounts found", None)?;
    Ok(s)
}

fn probe_disk_low(logger: &Arc<dyn SignalLogger>) -> Result<Signal, SignalError> {
    let mut s = stage_signal(logger);
    s.log_warning("disk low", None)?.message_full = Some("/var at 91% used".to_string());
    Ok(s)
}

fn store_disk_full(logger: &Arc<dyn SignalLogger>) -> Result<Signal, SignalError> {
    let mut s = stage_signal(logger);
    s.log_entry(
        FeedbackEntry::new(SignalLevel::Critical, "disk full")
            .with_nature(SignalNature::Operations)
            .with_error(Some(io_error(io::ErrorKind::Other, "no space left on device"))),
    )?;
    Ok(s)
}

fn collect_ok(logger: &Arc<dyn SignalLogger>) -> Result<Signal, SignalError> {
    let mut s = stage_signal(logger);
    s.log_verbose("collect: 120 rows", None)?;
    s.log_information("collect: done", None)?;
    Ok(s)
}

fn collect_throttled(logger: &Arc<dyn SignalLogger>) -> Result<Signal, SignalError> {
    let mut s = stage_signal(logger);
    for attempt in 1..=3 {
        s.log_retry(format!("upstream throttled (attempt {})", attempt), None)?;
    }
    Ok(s)
}

fn store_ok(logger: &Arc<dyn SignalLogger>) -> Result<Signal, SignalError> {
    let mut s = stage_signal(logger);
    s.log_information("store: committed", None)?;
    Ok(s)
}

fn stages_for(scenario: &str) -> Option<Vec<Stage>> {
    let stages: Vec<Stage> = match scenario {
        "healthy" => vec![probe_ok as Stage, collect_ok, store_ok],
        "disk-pressure" => vec![probe_disk_low as Stage, store_disk_full, collect_ok],
        "retry-storm" => vec![probe_ok as Stage, collect_throttled, store_ok],
        "missing-payload" => vec![probe_ok as Stage],
        _ => return None,
    };
    Some(stages)
}

// ============================================================================
// Runner
// ============================================================================

/// Run a named scenario. `Ok(None)` for an unknown name.
pub fn run_scenario(
    scenario: &str,
    logger: Arc<dyn SignalLogger>,
) -> Result<Option<SimulationReport>, SignalError> {
    let Some(stages) = stages_for(scenario) else {
        return Ok(None);
    };

    let mut outcome: TypedSignal<DiskUsage> = if scenario == "missing-payload" {
        TypedSignal::from_factory(
            || Err::<DiskUsage, _>("no mount selected"),
            Vec::<&Signal>::new(),
        )
    } else {
        TypedSignal::new()
    };

    let mut stages_run = 0;
    for stage in &stages {
        let signal = stage(&logger)?;
        stages_run += 1;
        if outcome.merge_and_check_failure([&signal]) {
            debug!(scenario, stages_run, "stopping after failed stage");
            break;
        }
    }

    if let Some(usage) = outcome.result_mut() {
        usage.mount = "/var".to_string();
        usage.used_percent = if scenario == "disk-pressure" { 100 } else { 42 };
    }

    let entries = outcome.entry_messages().collect();
    let (payload, signal) = outcome.into_parts();

    Ok(Some(SimulationReport {
        scenario: scenario.to_string(),
        stages_run,
        stages_planned: stages.len(),
        success: signal.success(),
        failure: signal.failure(),
        payload,
        entries,
        signal,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::{LogBucket, MemoryLogger};

    fn run(name: &str) -> (SimulationReport, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        let report = run_scenario(name, logger.clone()).unwrap().unwrap();
        (report, logger)
    }

    #[test]
    fn test_healthy() {
        let (report, logger) = run("healthy");
        assert!(report.success);
        assert!(!report.failure);
        assert_eq!(report.stages_run, 3);
        assert_eq!(report.signal.level(), SignalLevel::Information);
        // verbose entry recorded but not forwarded
        assert_eq!(report.entries.len(), 4);
        assert_eq!(logger.len(), 3);
    }

    #[test]
    fn test_disk_pressure_stops_after_failure() {
        let (report, logger) = run("disk-pressure");
        assert!(report.failure);
        assert_eq!(report.stages_run, 2);
        assert_eq!(report.signal.critical_summary(), "disk full");
        assert_eq!(report.payload.as_ref().map(|p| p.used_percent), Some(100));
        assert_eq!(
            report.entries,
            vec![
                "<Warning>disk low".to_string(),
                "<Critical>disk full - no space left on device".to_string()
            ]
        );
        let records = logger.records();
        assert_eq!(records.last().map(|r| r.bucket), Some(LogBucket::Error));
    }

    #[test]
    fn test_retry_storm_is_still_success() {
        let (report, logger) = run("retry-storm");
        assert!(report.success);
        assert!(!report.failure);
        assert_eq!(report.signal.level(), SignalLevel::Retry);
        assert_eq!(
            logger
                .records()
                .iter()
                .filter(|r| r.message.starts_with("Retry: "))
                .count(),
            3
        );
    }

    #[test]
    fn test_missing_payload() {
        let (report, _) = run("missing-payload");
        assert!(report.payload.is_none());
        assert!(report.success);
    }

    #[test]
    fn test_unknown_scenario() {
        let logger = Arc::new(MemoryLogger::new());
        assert!(run_scenario("byzantine", logger).unwrap().is_none());
    }

    #[test]
    fn test_every_listed_scenario_runs() {
        for name in SCENARIOS {
            let (report, _) = run(name);
            assert_eq!(report.scenario, name);
        }
    }
}
