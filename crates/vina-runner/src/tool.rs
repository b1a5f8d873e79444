//! Location of the external docking executable.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{DockingError, Result};

/// Program name looked up on `PATH` when no tool path is configured.
pub const DEFAULT_TOOL_NAME: &str = "vina";

/// Absolute path to the docking executable, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolLocation {
    path: PathBuf,
}

impl ToolLocation {
    /// Resolve a configured tool path.
    ///
    /// A bare program name (no directory component) is searched on `PATH`;
    /// relative paths are anchored at the current directory. Resolution never
    /// fails: a location that does not exist is reported later by [`locate`].
    ///
    /// [`locate`]: ToolLocation::locate
    pub fn resolve(configured: &Path) -> Self {
        if is_bare_name(configured) {
            if let Some(found) = search_path(configured) {
                debug!(tool = %found.display(), "resolved docking tool on PATH");
                return Self { path: found };
            }
        }

        let path = if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(configured))
                .unwrap_or_else(|_| configured.to_path_buf())
        };
        Self { path }
    }

    /// Use `path` verbatim, without `PATH` lookup.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check that the location refers to an existing executable file.
    pub fn locate(&self) -> Result<&Path> {
        let meta = std::fs::metadata(&self.path).map_err(|_| {
            DockingError::Configuration(format!(
                "docking executable not found at {}",
                self.path.display()
            ))
        })?;
        if !meta.is_file() {
            return Err(DockingError::Configuration(format!(
                "docking executable path {} is not a file",
                self.path.display()
            )));
        }
        if !is_executable(&meta) {
            return Err(DockingError::Configuration(format!(
                "docking executable {} is not executable",
                self.path.display()
            )));
        }
        Ok(&self.path)
    }

    /// Run the tool with `--version` and return the first non-empty line it prints.
    pub async fn probe_version(&self) -> Result<String> {
        let program = self.locate()?;
        let output = Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DockingError::Execution(format!("failed to start docking tool: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        stdout
            .lines()
            .chain(stderr.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string)
            .ok_or_else(|| DockingError::Execution("docking tool printed no version".into()))
    }
}

impl std::fmt::Display for ToolLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

fn is_bare_name(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    )
}

fn search_path(name: &Path) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| {
            std::fs::metadata(candidate)
                .map(|m| m.is_file() && is_executable(&m))
                .unwrap_or(false)
        })
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    true
}
