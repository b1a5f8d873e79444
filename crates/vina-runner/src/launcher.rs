//! Child process execution for the docking tool.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::command::DockingCommand;
use crate::error::{DockingError, Result};

/// What a finished child process left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ProcessOutput {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout followed by stderr, as written to the job log.
    pub fn transcript(&self) -> String {
        let mut text = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&self.stderr);
        }
        text
    }
}

/// Spawns the docking tool and waits for it.
///
/// The seam between the runner and the operating system; tests substitute
/// spies and scripted launchers.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Run `command` in `work_dir` and wait for it to terminate.
    ///
    /// A process that cannot be started is an [`DockingError::Execution`];
    /// exceeding `timeout` kills the child and yields [`DockingError::Timeout`].
    async fn launch(
        &self,
        command: &DockingCommand,
        work_dir: &Path,
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput>;
}

/// [`ProcessLauncher`] backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioLauncher;

#[async_trait]
impl ProcessLauncher for TokioLauncher {
    async fn launch(
        &self,
        command: &DockingCommand,
        work_dir: &Path,
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput> {
        let start = Instant::now();

        debug!(program = %command.program.display(), work_dir = %work_dir.display(), "spawning docking tool");

        // Dropping the child on timeout sends it SIGKILL.
        let child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DockingError::Execution(format!(
                    "failed to start docking tool {}: {e}",
                    command.program.display()
                ))
            })?;

        let output = match timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(waited) => waited?,
                Err(_elapsed) => {
                    let limit_ms = limit.as_millis() as u64;
                    warn!(limit_ms, "docking tool exceeded timeout, killed");
                    return Err(DockingError::Timeout { limit_ms });
                }
            },
            None => child.wait_with_output().await?,
        };

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn shell_command(script: &str) -> DockingCommand {
        DockingCommand {
            program: PathBuf::from("sh"),
            args: vec!["-c".to_string(), script.to_string()],
            output_path: PathBuf::from("docked_output.pdbqt"),
            log_path: PathBuf::from("vina_log.txt"),
        }
    }

    #[test]
    fn test_transcript_joins_streams() {
        let out = ProcessOutput {
            exit_code: Some(1),
            stdout: "reading input".to_string(),
            stderr: "boom\n".to_string(),
            duration_ms: 5,
        };
        assert_eq!(out.transcript(), "reading input\nboom\n");
        assert!(!out.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_launch_captures_stdout() {
        let out = TokioLauncher
            .launch(&shell_command("echo hello"), Path::new("."), None)
            .await
            .expect("launch failed");
        assert!(out.success());
        assert!(out.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_launch_reports_exit_code() {
        let out = TokioLauncher
            .launch(&shell_command("echo boom >&2; exit 3"), Path::new("."), None)
            .await
            .expect("launch failed");
        assert_eq!(out.exit_code, Some(3));
        assert!(out.stderr.contains("boom"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_launch_timeout() {
        let result = TokioLauncher
            .launch(
                &shell_command("sleep 5"),
                Path::new("."),
                Some(Duration::from_millis(100)),
            )
            .await;
        match result {
            Err(DockingError::Timeout { .. }) => {}
            other => panic!("expected Timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_launch_missing_program() {
        let cmd = DockingCommand {
            program: PathBuf::from("/nonexistent/bin/vina"),
            args: vec![],
            output_path: PathBuf::from("out.pdbqt"),
            log_path: PathBuf::from("log.txt"),
        };
        match TokioLauncher.launch(&cmd, Path::new("."), None).await {
            Err(DockingError::Execution(msg)) => assert!(msg.contains("failed to start")),
            other => panic!("expected Execution, got {:?}", other),
        }
    }
}
