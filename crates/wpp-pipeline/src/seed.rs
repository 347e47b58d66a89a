//! Create-if-absent file writes.
//!
//! Seeded files belong to the user after the first write, so an existing file
//! is the success path and is never touched.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use wpp_core::{Error, Event, Level, PluginLayout, Reporter, Result, Stage};

/// Outcome of [`seed_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedOutcome {
    /// The file was written
    Created,
    /// The file was already present and left unchanged
    Existing,
}

/// Writes `content` to `path` unless the file already exists.
///
/// Uses create-new semantics, so a file created concurrently by someone else
/// is reported as [`SeedOutcome::Existing`] instead of being overwritten.
///
/// # Errors
///
/// Returns [`Error::Filesystem`] if the file cannot be created or written,
/// including when the parent directory is missing.
///
/// # Examples
///
/// ```
/// use wpp_pipeline::seed::{SeedOutcome, seed_file};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("style.css");
///
/// assert_eq!(seed_file(&path, "/* a */").unwrap(), SeedOutcome::Created);
/// assert_eq!(seed_file(&path, "/* b */").unwrap(), SeedOutcome::Existing);
/// assert_eq!(std::fs::read_to_string(&path).unwrap(), "/* a */");
/// ```
pub fn seed_file(path: &Path, content: &str) -> Result<SeedOutcome> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            tracing::debug!("Seed target already exists: {}", path.display());
            return Ok(SeedOutcome::Existing);
        }
        Err(e) => return Err(Error::filesystem("create file", path, e)),
    };

    file.write_all(content.as_bytes())
        .map_err(|e| Error::filesystem("write file", path, e))?;

    tracing::debug!("Seeded {}", path.display());
    Ok(SeedOutcome::Created)
}

/// Ensures the baseline stylesheet and script exist.
///
/// Expects the layout to be provisioned. Returns the files that were created.
///
/// # Errors
///
/// Returns the first filesystem error.
pub fn seed(layout: &PluginLayout, reporter: &dyn Reporter) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();

    for asset in layout.seed_assets() {
        match seed_file(&asset.path, &asset.content)? {
            SeedOutcome::Created => {
                reporter.emit(
                    Event::new(Level::Success, Stage::Seed, "Created placeholder asset")
                        .with_path(&asset.path),
                );
                created.push(asset.path);
            }
            SeedOutcome::Existing => {
                reporter.emit(
                    Event::new(Level::Info, Stage::Seed, "Asset already exists")
                        .with_path(&asset.path),
                );
            }
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use wpp_core::{MemoryReporter, PackagerConfig};

    #[test]
    fn test_seed_file_missing_parent_is_error() {
        let temp = TempDir::new().unwrap();
        let err = seed_file(&temp.path().join("missing/style.css"), "x").unwrap_err();
        assert_eq!(err.kind(), wpp_core::ErrorKind::Filesystem);
    }

    #[test]
    fn test_seed_never_overwrites_user_edits() {
        let temp = TempDir::new().unwrap();
        let layout = PluginLayout::new(temp.path(), &PackagerConfig::default()).unwrap();
        fs::create_dir_all(layout.css_dir()).unwrap();
        fs::create_dir_all(layout.js_dir()).unwrap();

        let reporter = MemoryReporter::new();
        let created = seed(&layout, &reporter).unwrap();
        assert_eq!(created.len(), 2);

        let css = layout.css_dir().join("names-fusion.css");
        assert_eq!(fs::read_to_string(&css).unwrap(), "/* Names Fusion Styles */");

        fs::write(&css, ".nf { color: red; }").unwrap();
        let created = seed(&layout, &reporter).unwrap();
        assert!(created.is_empty());
        assert_eq!(fs::read_to_string(&css).unwrap(), ".nf { color: red; }");
        assert_eq!(
            fs::read_to_string(layout.js_dir().join("names-fusion.js")).unwrap(),
            "/* Names Fusion jQuery Script */"
        );
    }
}
