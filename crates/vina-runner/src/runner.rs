//! The docking job runner: locate, build, execute, classify.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn, Instrument};
use uuid::Uuid;

use crate::command::{build_command, DockingCommand};
use crate::config::RunnerConfig;
use crate::error::{DockingError, Result};
use crate::launcher::{ProcessLauncher, ProcessOutput, TokioLauncher};
use crate::obs;
use crate::request::{DockingBox, DockingRequest};
use crate::result::{classify, DockingResult};
use crate::staging::stage_inputs;
use crate::tool::ToolLocation;

/// Record of one submitted job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Fingerprint of the command line; absent when the job was rejected
    /// before a command could be built.
    pub fingerprint: Option<String>,
    pub result: DockingResult,
}

impl JobRecord {
    /// Record for a job that failed before reaching the runner, e.g. while
    /// staging uploads.
    pub fn rejected(err: DockingError) -> Self {
        let now = Utc::now();
        Self {
            job_id: Uuid::new_v4().to_string(),
            started_at: now,
            finished_at: now,
            fingerprint: None,
            result: err.into(),
        }
    }
}

/// Turns [`DockingRequest`]s into [`DockingResult`]s by driving the external tool.
///
/// Jobs share fixed input, output and log file names, so every submission
/// holds an in-process guard for the whole job and concurrent submissions
/// run one after the other. Use [`submit_uploads`](Self::submit_uploads) to
/// stage the inputs under the same guard.
pub struct DockingRunner {
    config: RunnerConfig,
    tool: ToolLocation,
    launcher: Arc<dyn ProcessLauncher>,
    guard: Mutex<()>,
}

impl DockingRunner {
    /// Create a runner spawning real processes; the tool path is resolved once here.
    pub fn new(config: RunnerConfig) -> Self {
        Self::with_launcher(config, Arc::new(TokioLauncher))
    }

    pub fn with_launcher(config: RunnerConfig, launcher: Arc<dyn ProcessLauncher>) -> Self {
        let tool = ToolLocation::resolve(&config.tool_path);
        Self {
            config,
            tool,
            launcher,
            guard: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn tool(&self) -> &ToolLocation {
        &self.tool
    }

    /// Check that the docking executable exists and is runnable.
    pub fn locate(&self) -> Result<&Path> {
        self.tool.locate()
    }

    /// Build the tool invocation for `request`.
    pub fn build_command(&self, request: &DockingRequest) -> Result<DockingCommand> {
        build_command(
            self.tool.path(),
            request,
            &self.config.output_file,
            &self.config.log_file,
        )
    }

    /// Run `command` to completion and write the captured output to its log file.
    pub async fn execute(&self, command: &DockingCommand) -> Result<ProcessOutput> {
        let output = self
            .launcher
            .launch(command, &self.config.work_dir, self.config.timeout())
            .await?;

        let log_path = self.in_work_dir(&command.log_path);
        tokio::fs::write(&log_path, output.transcript())
            .await
            .map_err(|e| {
                DockingError::Execution(format!(
                    "failed to write log file {}: {e}",
                    log_path.display()
                ))
            })?;

        debug!(
            exit_code = ?output.exit_code,
            duration_ms = output.duration_ms,
            log = %log_path.display(),
            "docking tool exited"
        );
        Ok(output)
    }

    /// Submit one job and wait for its result. Never fails: every error
    /// becomes a [`DockingResult::Failure`].
    pub async fn submit(&self, request: &DockingRequest) -> DockingResult {
        self.submit_recorded(request).await.result
    }

    /// Like [`submit`](Self::submit), also returning job metadata.
    pub async fn submit_recorded(&self, request: &DockingRequest) -> JobRecord {
        let _serialized = self.guard.lock().await;
        self.record_job(request).await
    }

    /// Stage uploaded receptor and ligand content under the fixed input names
    /// in the working directory, then run the job. Staging happens under the
    /// job guard, so a waiting submission cannot overwrite the inputs of the
    /// one in flight.
    pub async fn submit_uploads(
        &self,
        receptor: &[u8],
        ligand: &[u8],
        docking_box: DockingBox,
    ) -> JobRecord {
        let _serialized = self.guard.lock().await;

        match stage_inputs(&self.config.work_dir, receptor, ligand, docking_box) {
            Ok(request) => self.record_job(&request).await,
            Err(err) => {
                warn!(error = %err, "failed to stage docking inputs");
                self.clear_artifacts().await;
                JobRecord::rejected(err)
            }
        }
    }

    /// Blocking form of [`submit`](Self::submit) for callers without an async
    /// runtime. Called from inside one, it fails without running the job.
    pub fn submit_blocking(&self, request: &DockingRequest) -> DockingResult {
        if tokio::runtime::Handle::try_current().is_ok() {
            return DockingError::Execution(
                "submit_blocking called from within an async runtime; use submit".into(),
            )
            .into();
        }
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt.block_on(self.submit(request)),
            Err(e) => DockingError::Execution(format!("failed to start runtime: {e}")).into(),
        }
    }

    /// Run one job; the caller holds the guard.
    async fn record_job(&self, request: &DockingRequest) -> JobRecord {
        let job_id = Uuid::new_v4().to_string();
        let span = obs::job_span(&job_id);
        let started_at = Utc::now();

        let (fingerprint, result) = self.run_job(&job_id, request).instrument(span).await;

        JobRecord {
            job_id,
            started_at,
            finished_at: Utc::now(),
            fingerprint,
            result,
        }
    }

    async fn run_job(
        &self,
        job_id: &str,
        request: &DockingRequest,
    ) -> (Option<String>, DockingResult) {
        obs::emit_job_started(job_id, &self.tool.to_string());

        let command = match self.prepare(request) {
            Ok(command) => command,
            Err(err) => {
                obs::emit_job_rejected(job_id, err.kind(), &err.to_string());
                self.clear_artifacts().await;
                return (None, err.into());
            }
        };

        let fingerprint = command.fingerprint();
        obs::emit_command_built(job_id, &fingerprint, &command.display_line());

        let output_path = self.in_work_dir(&command.output_path);
        let log_path = self.in_work_dir(&command.log_path);
        remove_if_present(&output_path).await;
        remove_if_present(&log_path).await;

        let start = Instant::now();
        let result = match self.execute(&command).await {
            Ok(output) => classify(&output),
            Err(err) => {
                // No transcript was captured; replace whatever the tool
                // wrote to its log before it died.
                write_failure_note(&log_path, &err).await;
                err.into()
            }
        };

        if !result.is_success() {
            remove_if_present(&output_path).await;
        }

        obs::emit_job_finished(
            job_id,
            start.elapsed().as_millis() as u64,
            result.is_success(),
        );
        (Some(fingerprint), result)
    }

    /// Everything that must hold before the tool is invoked, in order:
    /// tool present, parameters valid, input files readable.
    fn prepare(&self, request: &DockingRequest) -> Result<DockingCommand> {
        self.locate()?;
        let command = self.build_command(request)?;

        let resolved = DockingRequest {
            receptor_path: self.in_work_dir(&request.receptor_path),
            ligand_path: self.in_work_dir(&request.ligand_path),
            docking_box: request.docking_box,
        };
        resolved.check_input_files()?;

        Ok(command)
    }

    fn in_work_dir(&self, path: &Path) -> PathBuf {
        self.config.work_dir.join(path)
    }

    /// A rejected job leaves no output or log, not even a previous job's.
    async fn clear_artifacts(&self) {
        remove_if_present(&self.in_work_dir(&self.config.output_file)).await;
        remove_if_present(&self.in_work_dir(&self.config.log_file)).await;
    }
}

async fn remove_if_present(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "removed stale docking file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove docking file"),
    }
}

async fn write_failure_note(log_path: &Path, err: &DockingError) {
    let note = format!("docking failed ({}): {err}\n", err.kind());
    if let Err(e) = tokio::fs::write(log_path, note).await {
        warn!(path = %log_path.display(), error = %e, "failed to write failure note");
    }
}
