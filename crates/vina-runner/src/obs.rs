//! Structured observability hooks for docking job lifecycle events.
//!
//! Events are emitted at `info!` level inside a job-scoped span; filter with
//! `RUST_LOG` and switch to JSON lines with the front-end's `--json` flag.

use tracing::{info, warn};

use crate::error::FailureKind;

/// Span carrying the job id; attach with `tracing::Instrument`.
pub fn job_span(job_id: &str) -> tracing::Span {
    tracing::info_span!("vina.job", job_id = %job_id)
}

/// Emit event: job accepted by the runner.
pub fn emit_job_started(job_id: &str, tool: &str) {
    info!(event = "job.started", job_id = %job_id, tool = %tool);
}

/// Emit event: command line built, with its fingerprint.
pub fn emit_command_built(job_id: &str, fingerprint: &str, command_line: &str) {
    info!(
        event = "job.command_built",
        job_id = %job_id,
        fingerprint = %&fingerprint[..12.min(fingerprint.len())],
        command = %command_line,
    );
}

/// Emit event: job rejected before the tool was invoked.
pub fn emit_job_rejected(job_id: &str, kind: FailureKind, reason: &str) {
    warn!(event = "job.rejected", job_id = %job_id, kind = %kind, reason = %reason);
}

/// Emit event: job finished (after the tool ran or failed to start).
pub fn emit_job_finished(job_id: &str, duration_ms: u64, success: bool) {
    info!(
        event = "job.finished",
        job_id = %job_id,
        duration_ms = duration_ms,
        success = success,
    );
}
