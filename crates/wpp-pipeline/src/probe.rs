//! Pre-build environment checks.
//!
//! Nothing here fails the pipeline. Findings become warning events.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use wpp_core::{Event, Level, PluginLayout, Reporter, Stage};

/// Findings of [`run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    /// Resolved `package.json` of the minifier, if the probe ran and found it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minifier: Option<PathBuf>,
    /// Sibling directories that look like copies of the plugin
    pub plugin_folders: Vec<PathBuf>,
}

/// Runs the minifier probe and the duplicate plugin folder scan.
pub fn run(layout: &PluginLayout, minifier: &str, reporter: &dyn Reporter) -> ProbeReport {
    let minifier = if minifier.is_empty() {
        None
    } else {
        probe_minifier(layout.project_root(), minifier, reporter)
    };

    ProbeReport {
        minifier,
        plugin_folders: probe_plugin_folders(layout, reporter),
    }
}

/// Looks up `node_modules/<name>/package.json` in `start` and its ancestors.
///
/// # Examples
///
/// ```
/// use wpp_pipeline::probe::find_node_package;
///
/// let dir = tempfile::tempdir().unwrap();
/// assert!(find_node_package(dir.path(), "terser").is_none());
///
/// let pkg = dir.path().join("node_modules/terser");
/// std::fs::create_dir_all(&pkg).unwrap();
/// std::fs::write(pkg.join("package.json"), "{}").unwrap();
///
/// let nested = dir.path().join("packages/site");
/// std::fs::create_dir_all(&nested).unwrap();
/// assert!(find_node_package(&nested, "terser").is_some());
/// ```
#[must_use]
pub fn find_node_package(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("node_modules").join(name).join("package.json"))
        .find(|manifest| manifest.is_file())
}

fn probe_minifier(project_root: &Path, minifier: &str, reporter: &dyn Reporter) -> Option<PathBuf> {
    let found = find_node_package(project_root, minifier);

    match &found {
        Some(manifest) => reporter.emit(
            Event::new(
                Level::Success,
                Stage::Probe,
                format!("{minifier} is installed"),
            )
            .with_path(manifest),
        ),
        None => {
            reporter.warn(
                Stage::Probe,
                &format!(
                    "{minifier} is not installed; the bundler will fall back to its default minifier"
                ),
            );
            reporter.warn(
                Stage::Probe,
                &format!("To use {minifier}, install it with: npm install {minifier} --save-dev"),
            );
        }
    }

    found
}

/// Lists sibling directories whose lowercase name contains every plugin id token.
///
/// The plugin root itself matches when it exists. An unreadable project root
/// yields an empty list.
#[must_use]
pub fn find_plugin_folders(layout: &PluginLayout) -> Vec<PathBuf> {
    let entries = match fs::read_dir(layout.project_root()) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                "Cannot scan {} for plugin folders: {}",
                layout.project_root().display(),
                e
            );
            return Vec::new();
        }
    };

    let tokens: Vec<&str> = layout.plugin_id().tokens().collect();
    let mut folders: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().to_lowercase();
            tokens.iter().all(|token| name.contains(token))
        })
        .map(|entry| entry.path())
        .collect();

    folders.sort();
    folders
}

fn probe_plugin_folders(layout: &PluginLayout, reporter: &dyn Reporter) -> Vec<PathBuf> {
    let folders = find_plugin_folders(layout);

    if folders.len() > 1 {
        reporter.warn(
            Stage::Probe,
            "Possible duplicate plugin directories detected; this might cause conflicts when installing in WordPress",
        );
        for folder in &folders {
            reporter.emit(
                Event::new(Level::Warn, Stage::Probe, "Possible plugin copy").with_path(folder),
            );
        }
    }

    folders
}
