//! Docking request and search-box types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DockingError, Result};

/// Default box center coordinate (Å).
pub const DEFAULT_CENTER: f64 = 0.0;

/// Default box edge length (Å).
pub const DEFAULT_SIZE: f64 = 20.0;

/// A point or extent in 3D space, in Å.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Components labelled with their axis, in x, y, z order.
    pub fn axes(&self) -> [(&'static str, f64); 3] {
        [("x", self.x), ("y", self.y), ("z", self.z)]
    }
}

/// The 3D search region handed to the docking tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DockingBox {
    pub center: Vec3,
    pub size: Vec3,
}

impl Default for DockingBox {
    fn default() -> Self {
        Self {
            center: Vec3::splat(DEFAULT_CENTER),
            size: Vec3::splat(DEFAULT_SIZE),
        }
    }
}

impl DockingBox {
    /// Check that every coordinate is finite and every extent is positive.
    pub fn validate(&self) -> Result<()> {
        for (axis, v) in self.center.axes() {
            if !v.is_finite() {
                return Err(DockingError::Validation(format!(
                    "center_{axis} must be a finite number, got {v}"
                )));
            }
        }
        for (axis, v) in self.size.axes() {
            if !v.is_finite() {
                return Err(DockingError::Validation(format!(
                    "size_{axis} must be a finite number, got {v}"
                )));
            }
            if v <= 0.0 {
                return Err(DockingError::Validation(format!(
                    "size_{axis} must be > 0, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// One docking job: two structure files and a search box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockingRequest {
    pub receptor_path: PathBuf,
    pub ligand_path: PathBuf,
    pub docking_box: DockingBox,
}

impl DockingRequest {
    pub fn new(
        receptor_path: impl Into<PathBuf>,
        ligand_path: impl Into<PathBuf>,
        docking_box: DockingBox,
    ) -> Self {
        Self {
            receptor_path: receptor_path.into(),
            ligand_path: ligand_path.into(),
            docking_box,
        }
    }

    /// Validate the request parameters without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.receptor_path.as_os_str().is_empty() {
            return Err(DockingError::Validation(
                "receptor path must not be empty".into(),
            ));
        }
        if self.ligand_path.as_os_str().is_empty() {
            return Err(DockingError::Validation(
                "ligand path must not be empty".into(),
            ));
        }
        self.docking_box.validate()
    }

    /// Check that both input files exist, are readable and are non-empty.
    pub fn check_input_files(&self) -> Result<()> {
        check_input_file("receptor", &self.receptor_path)?;
        check_input_file("ligand", &self.ligand_path)
    }
}

fn check_input_file(label: &str, path: &Path) -> Result<()> {
    let meta = std::fs::metadata(path).map_err(|e| {
        DockingError::Validation(format!("{label} file {} is not readable: {e}", path.display()))
    })?;
    if !meta.is_file() {
        return Err(DockingError::Validation(format!(
            "{label} path {} is not a regular file",
            path.display()
        )));
    }
    if meta.len() == 0 {
        return Err(DockingError::Validation(format!(
            "{label} file {} is empty",
            path.display()
        )));
    }
    // Metadata succeeds without read permission.
    std::fs::File::open(path).map_err(|e| {
        DockingError::Validation(format!("{label} file {} is not readable: {e}", path.display()))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn request_with_box(docking_box: DockingBox) -> DockingRequest {
        DockingRequest::new("receptor.pdbqt", "ligand.pdbqt", docking_box)
    }

    #[test]
    fn test_default_box_matches_form_defaults() {
        let b = DockingBox::default();
        assert_eq!(b.center, Vec3::splat(0.0));
        assert_eq!(b.size, Vec3::splat(20.0));
        assert!(b.validate().is_ok());
    }

    #[test]
    fn test_non_positive_size_rejected() {
        for size in [
            Vec3::new(0.0, 20.0, 20.0),
            Vec3::new(20.0, -1.0, 20.0),
            Vec3::new(20.0, 20.0, 0.0),
        ] {
            let req = request_with_box(DockingBox {
                center: Vec3::splat(0.0),
                size,
            });
            match req.validate() {
                Err(DockingError::Validation(msg)) => assert!(msg.contains("must be > 0")),
                other => panic!("expected Validation, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let req = request_with_box(DockingBox {
            center: Vec3::new(f64::NAN, 0.0, 0.0),
            size: Vec3::splat(20.0),
        });
        assert!(matches!(req.validate(), Err(DockingError::Validation(_))));

        let req = request_with_box(DockingBox {
            center: Vec3::splat(0.0),
            size: Vec3::new(20.0, f64::INFINITY, 20.0),
        });
        assert!(matches!(req.validate(), Err(DockingError::Validation(_))));
    }

    #[test]
    fn test_empty_paths_rejected() {
        let req = DockingRequest::new("", "ligand.pdbqt", DockingBox::default());
        match req.validate() {
            Err(DockingError::Validation(msg)) => assert!(msg.contains("receptor")),
            other => panic!("expected Validation, got {:?}", other),
        }

        let req = DockingRequest::new("receptor.pdbqt", "", DockingBox::default());
        match req.validate() {
            Err(DockingError::Validation(msg)) => assert!(msg.contains("ligand")),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_check_input_files() {
        let dir = tempdir().unwrap();
        let receptor = dir.path().join("receptor.pdbqt");
        let ligand = dir.path().join("ligand.pdbqt");
        std::fs::write(&receptor, b"ATOM      1  N   ALA A   1\n").unwrap();

        let req = DockingRequest::new(&receptor, &ligand, DockingBox::default());
        match req.check_input_files() {
            Err(DockingError::Validation(msg)) => assert!(msg.contains("ligand")),
            other => panic!("expected Validation, got {:?}", other),
        }

        std::fs::write(&ligand, b"").unwrap();
        match req.check_input_files() {
            Err(DockingError::Validation(msg)) => assert!(msg.contains("empty")),
            other => panic!("expected Validation, got {:?}", other),
        }

        std::fs::write(&ligand, b"ROOT\nENDROOT\n").unwrap();
        assert!(req.check_input_files().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_input_file_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let receptor = dir.path().join("receptor.pdbqt");
        let ligand = dir.path().join("ligand.pdbqt");
        std::fs::write(&receptor, b"ATOM      1  N   ALA A   1\n").unwrap();
        std::fs::write(&ligand, b"ROOT\nENDROOT\n").unwrap();
        std::fs::set_permissions(&receptor, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read regardless of mode bits.
        if std::fs::File::open(&receptor).is_ok() {
            return;
        }

        let req = DockingRequest::new(&receptor, &ligand, DockingBox::default());
        match req.check_input_files() {
            Err(DockingError::Validation(msg)) => {
                assert!(msg.contains("receptor"));
                assert!(msg.contains("not readable"));
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_is_not_an_input_file() {
        let dir = tempdir().unwrap();
        let ligand = dir.path().join("ligand.pdbqt");
        std::fs::write(&ligand, b"ROOT\n").unwrap();

        let req = DockingRequest::new(dir.path(), &ligand, DockingBox::default());
        assert!(matches!(
            req.check_input_files(),
            Err(DockingError::Validation(_))
        ));
    }
}
