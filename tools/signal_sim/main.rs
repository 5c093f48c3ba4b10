//! Signal Simulator - deterministic scenarios for signal_core
//!
//! Usage:
//!   signal_sim --scenario healthy
//!   signal_sim --scenario disk-pressure --output-dir ./artifacts/simulations
//!   signal_sim --config sim.toml --json-logs
//!
//! Prints a summary per scenario and optionally writes JSON reports.
//! Exits non-zero when any scenario ends in failure.

mod config;
mod scenarios;

use anyhow::{bail, Context, Result};
use clap::Parser;
use signal_core::{SignalLogger, TracingLogger};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::SimConfig;
use scenarios::{run_scenario, SimulationReport, SCENARIOS};

#[derive(Parser, Debug)]
#[command(name = "signal_sim")]
#[command(about = "Run staged signal scenarios and report their merged outcome", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scenario to run (repeatable); defaults to all
    #[arg(long)]
    scenario: Vec<String>,

    /// Write one JSON report per scenario into this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(config: &SimConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn write_report(dir: &Path, report: &SimulationReport) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("{}.json", report.scenario));
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn print_summary(report: &SimulationReport) {
    println!("\n=== Signal Simulation: {} ===\n", report.scenario);
    println!("Stages:               {}/{}", report.stages_run, report.stages_planned);
    println!("Level:                {}", report.signal.level());
    println!("Success:              {}", report.success);
    println!("Failure:              {}", report.failure);
    match &report.payload {
        Some(usage) => println!("Payload:              {} at {}%", usage.mount, usage.used_percent),
        None => println!("Payload:              none"),
    }
    let summary = report.signal.critical_summary();
    if !summary.is_empty() {
        println!("Critical:             {}", summary);
    }
    for entry in &report.entries {
        println!("  {}", entry);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SimConfig::load(cli.config.as_deref())?;
    if !cli.scenario.is_empty() {
        config.scenarios = cli.scenario;
    }
    if cli.output_dir.is_some() {
        config.output_dir = cli.output_dir;
    }
    config.json_logs |= cli.json_logs;

    init_logging(&config);
    info!("signal_sim v{} starting", env!("CARGO_PKG_VERSION"));

    let names: Vec<String> = if config.scenarios.is_empty() {
        SCENARIOS.iter().map(|s| s.to_string()).collect()
    } else {
        config.scenarios.clone()
    };

    let logger: Arc<dyn SignalLogger> = Arc::new(TracingLogger);
    let mut any_failed = false;

    for name in &names {
        let Some(report) = run_scenario(name, Arc::clone(&logger))? else {
            bail!("unknown scenario: {} (valid: {})", name, SCENARIOS.join(", "));
        };
        print_summary(&report);

        if let Some(dir) = &config.output_dir {
            let path = write_report(dir, &report)?;
            println!("\nReport saved to: {}", path.display());
        }
        any_failed |= report.failure;
    }

    if any_failed {
        std::process::exit(1);
    }
    Ok(())
}
