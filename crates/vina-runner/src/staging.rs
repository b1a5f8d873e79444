//! Staging uploaded structures under their fixed names.

use std::path::Path;

use tracing::debug;

use crate::error::{DockingError, Result};
use crate::request::{DockingBox, DockingRequest};

/// Staged receptor file name, relative to the working directory.
pub const RECEPTOR_FILE: &str = "receptor.pdbqt";

/// Staged ligand file name, relative to the working directory.
pub const LIGAND_FILE: &str = "ligand.pdbqt";

/// Write uploaded receptor and ligand content into `work_dir` and return
/// a request pointing at the staged files.
///
/// Empty uploads are rejected before anything is written. The file names are
/// shared by every job in `work_dir`; while a runner may be busy, stage through
/// [`DockingRunner::submit_uploads`](crate::DockingRunner::submit_uploads).
pub fn stage_inputs(
    work_dir: &Path,
    receptor: &[u8],
    ligand: &[u8],
    docking_box: DockingBox,
) -> Result<DockingRequest> {
    if receptor.is_empty() {
        return Err(DockingError::Validation("receptor upload is empty".into()));
    }
    if ligand.is_empty() {
        return Err(DockingError::Validation("ligand upload is empty".into()));
    }

    std::fs::create_dir_all(work_dir)?;
    std::fs::write(work_dir.join(RECEPTOR_FILE), receptor)?;
    std::fs::write(work_dir.join(LIGAND_FILE), ligand)?;

    debug!(
        work_dir = %work_dir.display(),
        receptor_bytes = receptor.len(),
        ligand_bytes = ligand.len(),
        "staged docking inputs"
    );

    Ok(DockingRequest::new(RECEPTOR_FILE, LIGAND_FILE, docking_box))
}
