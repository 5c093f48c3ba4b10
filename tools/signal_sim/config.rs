//! Simulator configuration.
//!
//! Loaded from an optional TOML file; command-line flags override it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Simulator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Log filter used when RUST_LOG is not set (e.g. "info", "signal=debug")
    pub log_level: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    /// Directory for per-scenario JSON reports
    pub output_dir: Option<PathBuf>,
    /// Scenarios to run; empty means all
    pub scenarios: Vec<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            output_dir: None,
            scenarios: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
