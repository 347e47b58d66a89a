//! Directory tree provisioning.

use crate::seed::{SeedOutcome, seed_file};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use wpp_core::{Error, Event, Level, MARKER_CONTENT, PluginLayout, Reporter, Result, Stage};

/// What [`provision`] changed on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    /// Directories that did not exist before
    pub created_dirs: Vec<PathBuf>,
    /// Marker files that were written
    pub created_markers: Vec<PathBuf>,
}

impl ProvisionReport {
    /// Returns `true` if the tree was already complete.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.created_dirs.is_empty() && self.created_markers.is_empty()
    }
}

/// Ensures every required directory exists and holds a marker.
///
/// Directories are handled parents first. Existing directories and markers
/// are left alone, so calling this repeatedly is safe.
///
/// # Errors
///
/// Returns [`Error::Filesystem`] on the first directory or marker that cannot
/// be created, including when a regular file occupies a required path.
pub fn provision(layout: &PluginLayout, reporter: &dyn Reporter) -> Result<ProvisionReport> {
    let mut report = ProvisionReport::default();

    for dir in layout.required_dirs() {
        if ensure_dir(dir)? {
            reporter.emit(
                Event::new(Level::Success, Stage::Provision, "Created directory").with_path(dir),
            );
            report.created_dirs.push(dir.to_path_buf());
        } else {
            tracing::debug!("Directory already exists: {}", dir.display());
        }

        let marker = PluginLayout::marker_path(dir);
        if seed_file(&marker, MARKER_CONTENT)? == SeedOutcome::Created {
            reporter.emit(
                Event::new(Level::Success, Stage::Provision, "Created index.php")
                    .with_path(&marker),
            );
            report.created_markers.push(marker);
        }
    }

    if report.is_unchanged() {
        reporter.info(Stage::Provision, "Plugin directory tree already complete");
    }

    Ok(report)
}

/// Creates `dir` and its ancestors. Returns `true` if it did not exist.
fn ensure_dir(dir: &Path) -> Result<bool> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => return Ok(false),
        Ok(_) => {
            return Err(Error::filesystem(
                "create directory",
                dir,
                io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
            ));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::filesystem("inspect directory", dir, e)),
    }

    fs::create_dir_all(dir).map_err(|e| Error::filesystem("create directory", dir, e))?;
    Ok(true)
}
