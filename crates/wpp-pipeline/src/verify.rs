//! Build output verification.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use wpp_core::{CheckMode, Error, Event, Level, PluginLayout, Reporter, Result, Stage};

/// Snapshot of the bundler output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildOutput {
    /// Whether the build directory exists
    pub build_dir_exists: bool,
    /// Whether the assets directory exists
    pub assets_dir_exists: bool,
    /// Entry names directly in the build directory, sorted
    pub build_listing: Vec<String>,
    /// Entry names in the assets directory, sorted
    pub assets_listing: Vec<String>,
    /// Asset file names ending in `.js`
    pub scripts: Vec<String>,
    /// Asset file names ending in `.css`
    pub stylesheets: Vec<String>,
}

impl BuildOutput {
    /// Reads the build and assets directories of `layout`.
    ///
    /// Missing directories are recorded, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Filesystem`] if an existing directory cannot be read.
    pub fn inspect(layout: &PluginLayout) -> Result<Self> {
        let mut output = Self::default();

        let Some(build_listing) = list_dir(layout.build_dir())? else {
            return Ok(output);
        };
        output.build_dir_exists = true;
        output.build_listing = build_listing;

        let Some(assets_listing) = list_dir(layout.assets_dir())? else {
            return Ok(output);
        };
        output.assets_dir_exists = true;

        for name in &assets_listing {
            let path = layout.assets_dir().join(name);
            if !path.is_file() {
                continue;
            }
            if name.ends_with(".js") {
                output.scripts.push(name.clone());
            } else if name.ends_with(".css") {
                output.stylesheets.push(name.clone());
            }
        }
        output.assets_listing = assets_listing;

        Ok(output)
    }

    /// Describes everything missing from the output, in check order.
    ///
    /// # Examples
    ///
    /// ```
    /// use wpp_pipeline::BuildOutput;
    ///
    /// let output = BuildOutput {
    ///     build_dir_exists: true,
    ///     assets_dir_exists: true,
    ///     scripts: vec!["index.abc123.js".to_string()],
    ///     ..BuildOutput::default()
    /// };
    /// assert_eq!(output.problems(), vec!["no CSS assets found".to_string()]);
    /// ```
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        if !self.build_dir_exists {
            return vec!["build directory does not exist".to_string()];
        }
        if !self.assets_dir_exists {
            return vec!["assets directory does not exist".to_string()];
        }

        let mut problems = Vec::new();
        if self.scripts.is_empty() {
            problems.push("no JavaScript assets found".to_string());
        }
        if self.stylesheets.is_empty() {
            problems.push("no CSS assets found".to_string());
        }
        problems
    }

    /// Returns `true` if both asset categories are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.problems().is_empty()
    }
}

/// Returns sorted entry names, or `None` if `dir` does not exist.
fn list_dir(dir: &Path) -> Result<Option<Vec<String>>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::filesystem("read directory", dir, e)),
    };

    let mut names = entries
        .map(|entry| {
            entry
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .map_err(|e| Error::filesystem("read directory", dir, e))
        })
        .collect::<Result<Vec<_>>>()?;
    names.sort();

    Ok(Some(names))
}

/// Inspects the build output and applies `mode` to what is missing.
///
/// In advisory mode every problem becomes an error event and the output is
/// returned. In strict mode problems abort with
/// [`Error::BuildOutputIncomplete`].
///
/// # Errors
///
/// Returns an error if a directory cannot be read, or on any problem under
/// [`CheckMode::Strict`].
pub fn verify(layout: &PluginLayout, mode: CheckMode, reporter: &dyn Reporter) -> Result<BuildOutput> {
    reporter.info(Stage::Verify, "Verifying build output");
    let output = BuildOutput::inspect(layout)?;

    if output.build_dir_exists {
        reporter.emit(
            Event::new(Level::Success, Stage::Verify, "Build directory exists")
                .with_path(layout.build_dir()),
        );
        reporter.info(
            Stage::Verify,
            &format!("Files in build directory: {}", output.build_listing.join(", ")),
        );
    } else {
        reporter.emit(
            Event::new(Level::Error, Stage::Verify, "Build directory does not exist")
                .with_path(layout.build_dir()),
        );
    }

    if output.assets_dir_exists {
        reporter.emit(
            Event::new(Level::Success, Stage::Verify, "Assets directory exists")
                .with_path(layout.assets_dir()),
        );
        reporter.info(
            Stage::Verify,
            &format!("Files in assets directory: {}", output.assets_listing.join(", ")),
        );
        report_category(reporter, layout, "JavaScript", &output.scripts);
        report_category(reporter, layout, "CSS", &output.stylesheets);
    } else if output.build_dir_exists {
        reporter.emit(
            Event::new(Level::Error, Stage::Verify, "Assets directory does not exist")
                .with_path(layout.assets_dir()),
        );
    }

    let problems = output.problems();
    if problems.is_empty() {
        return Ok(output);
    }

    if mode.is_strict() {
        return Err(Error::BuildOutputIncomplete { problems });
    }

    tracing::warn!("Build output incomplete: {}", problems.join("; "));
    Ok(output)
}

fn report_category(reporter: &dyn Reporter, layout: &PluginLayout, label: &str, files: &[String]) {
    if files.is_empty() {
        reporter.emit(
            Event::new(
                Level::Error,
                Stage::Verify,
                format!("No {label} assets found"),
            )
            .with_path(layout.assets_dir()),
        );
    } else {
        reporter.success(
            Stage::Verify,
            &format!("{label} assets found: {}", files.join(", ")),
        );
    }
}
