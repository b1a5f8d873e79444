//! Docking outcome and exit-status classification.

use serde::{Deserialize, Serialize};

use crate::error::{DockingError, FailureKind};
use crate::launcher::ProcessOutput;
use crate::report::DockingReport;

/// Outcome of one docking job, handed straight to the display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DockingResult {
    /// The tool exited with status 0; `raw_output` is its report text.
    Success { raw_output: String },
    /// The job failed; `reason` is meant for the user.
    Failure { kind: FailureKind, reason: String },
}

impl DockingResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DockingResult::Success { .. })
    }

    /// Failure class, `None` on success.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            DockingResult::Success { .. } => None,
            DockingResult::Failure { kind, .. } => Some(*kind),
        }
    }

    /// The text to show: tool output on success, the reason on failure.
    pub fn text(&self) -> &str {
        match self {
            DockingResult::Success { raw_output } => raw_output,
            DockingResult::Failure { reason, .. } => reason,
        }
    }

    /// Parse the binding-mode table out of a successful run.
    pub fn report(&self) -> Option<DockingReport> {
        match self {
            DockingResult::Success { raw_output } => Some(DockingReport::parse(raw_output)),
            DockingResult::Failure { .. } => None,
        }
    }
}

impl From<DockingError> for DockingResult {
    fn from(err: DockingError) -> Self {
        DockingResult::Failure {
            kind: err.kind(),
            reason: err.to_string(),
        }
    }
}

/// Classify a finished process: status 0 is success, anything else a failure.
///
/// The diagnostic text is carried over verbatim (stderr, then stdout).
pub fn classify(output: &ProcessOutput) -> DockingResult {
    if output.success() {
        return DockingResult::Success {
            raw_output: output.stdout.clone(),
        };
    }

    let status = match output.exit_code {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    };

    let diagnostic: Vec<&str> = [output.stderr.trim(), output.stdout.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();

    let reason = if diagnostic.is_empty() {
        format!("docking tool {status} without output")
    } else {
        format!("docking tool {status}:\n{}", diagnostic.join("\n"))
    };

    DockingResult::Failure {
        kind: FailureKind::Execution,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(exit_code: Option<i32>, stdout: &str, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            duration_ms: 10,
        }
    }

    #[test]
    fn test_zero_exit_is_success() {
        let result = classify(&output(Some(0), "Writing output ... done.\n", ""));
        assert!(result.is_success());
        assert_eq!(result.text(), "Writing output ... done.\n");
        assert_eq!(result.failure_kind(), None);
    }

    #[test]
    fn test_nonzero_exit_keeps_diagnostic() {
        let result = classify(&output(Some(1), "", "boom\n"));
        match &result {
            DockingResult::Failure { kind, reason } => {
                assert_eq!(*kind, FailureKind::Execution);
                assert!(reason.contains("status 1"));
                assert!(reason.contains("boom"));
            }
            other => panic!("expected Failure, got {:?}", other),
        }
        assert!(result.report().is_none());
    }

    #[test]
    fn test_diagnostic_on_stdout_is_kept() {
        let result = classify(&output(Some(2), "Parse error on line 3", ""));
        assert!(result.text().contains("Parse error on line 3"));
    }

    #[test]
    fn test_signal_termination() {
        let result = classify(&output(None, "", ""));
        assert!(result.text().contains("terminated by a signal"));
        assert!(result.text().contains("without output"));
    }

    #[test]
    fn test_from_error_keeps_kind() {
        let result: DockingResult = DockingError::Configuration("missing".into()).into();
        assert_eq!(result.failure_kind(), Some(FailureKind::Configuration));
        assert!(result.text().contains("missing"));
    }

    #[test]
    fn test_json_shape() {
        let result = DockingResult::Failure {
            kind: FailureKind::Validation,
            reason: "size_x must be > 0".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "validation");
    }
}
