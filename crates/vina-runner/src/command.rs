//! Deterministic construction of the docking tool's command line.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{DockingError, Result};
use crate::request::DockingRequest;

/// Random seed passed to the tool so identical inputs reproduce identical poses.
pub const DOCKING_SEED: u64 = 42;

/// A fully built invocation of the docking tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockingCommand {
    /// Executable to spawn.
    pub program: PathBuf,

    /// Arguments, in order.
    pub args: Vec<String>,

    /// Where the tool writes its docked poses.
    pub output_path: PathBuf,

    /// Where the captured tool output is logged.
    pub log_path: PathBuf,
}

impl DockingCommand {
    /// SHA-256 over the program and every argument, NUL separated.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.program.as_os_str().as_encoded_bytes());
        hasher.update(b"\0");
        for arg in &self.args {
            hasher.update(arg.as_bytes());
            hasher.update(b"\0");
        }
        hex::encode(hasher.finalize())
    }

    /// Shell-like rendering for logs and diagnostics.
    pub fn display_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Build the argument list for `request`.
///
/// Numbers are rendered with Rust's shortest round-trip representation
/// (always carrying a fractional part, e.g. `20.0`), so the tool receives
/// exactly the value that was validated.
pub fn build_command(
    program: &Path,
    request: &DockingRequest,
    output_path: &Path,
    log_path: &Path,
) -> Result<DockingCommand> {
    request.validate()?;

    let center = request.docking_box.center;
    let size = request.docking_box.size;

    let args = vec![
        "--receptor".to_string(),
        path_arg("receptor", &request.receptor_path)?,
        "--ligand".to_string(),
        path_arg("ligand", &request.ligand_path)?,
        "--center_x".to_string(),
        format_number(center.x),
        "--center_y".to_string(),
        format_number(center.y),
        "--center_z".to_string(),
        format_number(center.z),
        "--size_x".to_string(),
        format_number(size.x),
        "--size_y".to_string(),
        format_number(size.y),
        "--size_z".to_string(),
        format_number(size.z),
        "--seed".to_string(),
        DOCKING_SEED.to_string(),
        "--out".to_string(),
        path_arg("output", output_path)?,
        "--log".to_string(),
        path_arg("log", log_path)?,
    ];

    Ok(DockingCommand {
        program: program.to_path_buf(),
        args,
        output_path: output_path.to_path_buf(),
        log_path: log_path.to_path_buf(),
    })
}

/// Render a finite `f64` without rounding.
pub fn format_number(v: f64) -> String {
    format!("{v:?}")
}

fn path_arg(label: &str, path: &Path) -> Result<String> {
    path.to_str().map(str::to_string).ok_or_else(|| {
        DockingError::Validation(format!(
            "{label} path {} is not valid UTF-8",
            path.display()
        ))
    })
}
