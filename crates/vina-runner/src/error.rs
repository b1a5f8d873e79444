//! Error taxonomy for docking jobs.

use serde::{Deserialize, Serialize};

/// Errors produced while preparing or running a docking job.
///
/// None of these escape [`crate::DockingRunner::submit`]; they are folded into
/// a [`crate::DockingResult::Failure`] at the runner boundary.
#[derive(Debug, thiserror::Error)]
pub enum DockingError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("docking tool timed out after {limit_ms}ms and was killed")]
    Timeout { limit_ms: u64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config serialization failed: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

impl DockingError {
    /// Classify this error for the caller.
    pub fn kind(&self) -> FailureKind {
        match self {
            DockingError::Configuration(_)
            | DockingError::ConfigParse(_)
            | DockingError::ConfigSerialize(_) => FailureKind::Configuration,
            DockingError::Validation(_) => FailureKind::Validation,
            DockingError::Execution(_) | DockingError::Io(_) => FailureKind::Execution,
            DockingError::Timeout { .. } => FailureKind::Timeout,
        }
    }
}

/// Coarse class of a failed docking job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Configuration,
    Validation,
    Execution,
    Timeout,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Configuration => write!(f, "configuration"),
            FailureKind::Validation => write!(f, "validation"),
            FailureKind::Execution => write!(f, "execution"),
            FailureKind::Timeout => write!(f, "timeout"),
        }
    }
}

/// Result type for docking operations.
pub type Result<T> = std::result::Result<T, DockingError>;
