//! vina-runner: docking job runner for an external AutoDock Vina compatible tool.
//!
//! The runner owns the boundary between a form-style front-end and the
//! docking executable:
//! - Locates the tool and validates the request before anything runs
//! - Builds a deterministic command line (fixed seed, unrounded numbers)
//! - Runs the tool as a child process with an optional timeout
//! - Classifies the exit status into a [`DockingResult`]
//!
//! No docking happens in this crate; the external tool does all of it.

pub mod command;
pub mod config;
pub mod error;
pub mod launcher;
pub mod obs;
pub mod report;
pub mod request;
pub mod result;
pub mod runner;
pub mod staging;
pub mod telemetry;
pub mod tool;

// Re-export key types
pub use command::{build_command, DockingCommand, DOCKING_SEED};
pub use config::{RunnerConfig, DEFAULT_LOG_FILE, DEFAULT_OUTPUT_FILE};
pub use error::{DockingError, FailureKind, Result};
pub use launcher::{ProcessLauncher, ProcessOutput, TokioLauncher};
pub use report::{BindingMode, DockingReport};
pub use request::{DockingBox, DockingRequest, Vec3, DEFAULT_CENTER, DEFAULT_SIZE};
pub use result::{classify, DockingResult};
pub use runner::{DockingRunner, JobRecord};
pub use staging::{stage_inputs, LIGAND_FILE, RECEPTOR_FILE};
pub use telemetry::init_tracing;
pub use tool::{ToolLocation, DEFAULT_TOOL_NAME};
