//! Runner configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tool::DEFAULT_TOOL_NAME;

/// Default name of the docked-poses file the tool writes.
pub const DEFAULT_OUTPUT_FILE: &str = "docked_output.pdbqt";

/// Default name of the job log file.
pub const DEFAULT_LOG_FILE: &str = "vina_log.txt";

/// Configuration for a [`crate::DockingRunner`].
///
/// Relative file names are resolved against `work_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Docking executable; a bare name is looked up on `PATH`.
    pub tool_path: PathBuf,
    /// Directory holding staged inputs, output and log.
    pub work_dir: PathBuf,
    pub output_file: PathBuf,
    pub log_file: PathBuf,
    /// Kill the tool after this many seconds (unbounded when absent).
    pub timeout_secs: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tool_path: PathBuf::from(DEFAULT_TOOL_NAME),
            work_dir: PathBuf::from("."),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            timeout_secs: None,
        }
    }
}

impl RunnerConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn with_tool_path(mut self, tool_path: impl Into<PathBuf>) -> Self {
        self.tool_path = tool_path.into();
        self
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}
