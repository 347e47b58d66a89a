//! Front-end bundler invocation.
//!
//! The bundler is an external program. [`Bundler`] is the seam: the binary
//! uses [`CommandBundler`], tests substitute a stub that writes fake assets.

use async_trait::async_trait;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use wpp_core::config::BundlerConfig;
use wpp_core::{BuildMode, Error, Event, Level, MARKER_FILE, Reporter, Result, Stage};

/// Why a single bundler invocation failed.
#[derive(Error, Debug)]
pub enum InvocationError {
    /// The program could not be started.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted
        command: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The program ran and exited unsuccessfully.
    #[error("`{command}` exited with {}", describe_code(*code))]
    Exit {
        /// Command line that was run
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// Failure reported by a non-process bundler.
    #[error("{0}")]
    Other(String),
}

fn describe_code(code: Option<i32>) -> String {
    code.map_or_else(
        || "no exit code (terminated by signal)".to_string(),
        |c| format!("status {c}"),
    )
}

/// Produces the front-end build output.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use wpp_core::BuildMode;
/// use wpp_pipeline::{Bundler, InvocationError};
///
/// #[derive(Debug)]
/// struct AlwaysFails;
///
/// #[async_trait]
/// impl Bundler for AlwaysFails {
///     async fn bundle(&self, mode: BuildMode) -> Result<(), InvocationError> {
///         Err(InvocationError::Other(format!("{mode} build unavailable")))
///     }
/// }
/// ```
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Runs one build in `mode`.
    ///
    /// # Errors
    ///
    /// Returns an [`InvocationError`] if the build did not succeed.
    async fn bundle(&self, mode: BuildMode) -> std::result::Result<(), InvocationError>;

    /// Human-readable description of the invocation for `mode`.
    fn describe(&self, mode: BuildMode) -> String {
        format!("{mode} build")
    }
}

/// Runs the configured bundler as a child process in the project root.
///
/// All three standard streams are inherited, so bundler logs stream live and
/// interactive prompts (such as `npx` offering an install) can be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBundler {
    program: String,
    args: Vec<String>,
    fallback_args: Vec<String>,
    working_dir: PathBuf,
}

impl CommandBundler {
    /// Creates a bundler from explicit arguments.
    #[must_use]
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        fallback_args: Vec<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            fallback_args,
            working_dir: working_dir.into(),
        }
    }

    /// Creates a bundler from the `[bundler]` configuration section.
    #[must_use]
    pub fn from_config(config: &BundlerConfig, working_dir: impl Into<PathBuf>) -> Self {
        Self::new(
            config.program.clone(),
            config.args.clone(),
            config.fallback_args.clone(),
            working_dir,
        )
    }

    /// Arguments passed to the program in `mode`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wpp_core::BuildMode;
    /// use wpp_core::config::BundlerConfig;
    /// use wpp_pipeline::CommandBundler;
    ///
    /// let bundler = CommandBundler::from_config(&BundlerConfig::default(), ".");
    /// assert_eq!(
    ///     bundler.arguments(BuildMode::Development).last().map(String::as_str),
    ///     Some("--mode=development")
    /// );
    /// ```
    #[must_use]
    pub fn arguments(&self, mode: BuildMode) -> Vec<String> {
        let mut args = self.args.clone();
        if mode == BuildMode::Development {
            args.extend(self.fallback_args.iter().cloned());
        }
        args
    }
}

#[async_trait]
impl Bundler for CommandBundler {
    async fn bundle(&self, mode: BuildMode) -> std::result::Result<(), InvocationError> {
        let command = self.describe(mode);
        tracing::debug!("Running `{}` in {}", command, self.working_dir.display());

        let status = Command::new(&self.program)
            .args(self.arguments(mode))
            .current_dir(&self.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| InvocationError::Spawn {
                command: command.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InvocationError::Exit {
                command,
                code: status.code(),
            })
        }
    }

    fn describe(&self, mode: BuildMode) -> String {
        std::iter::once(self.program.clone())
            .chain(self.arguments(mode))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Outcome of [`invoke`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationReport {
    /// Mode of the invocation that succeeded
    pub mode: BuildMode,
    /// Stale files removed from the build directory
    pub removed: Vec<PathBuf>,
    /// Production failure that triggered the development fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_failure: Option<String>,
}

/// Deletes every non-directory entry directly inside `build_dir` except the marker.
///
/// Nested directories and their contents are left alone. A missing build
/// directory is not an error.
///
/// # Errors
///
/// Returns [`Error::Filesystem`] if the directory cannot be read or a file
/// cannot be removed.
pub fn clean_build_dir(build_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(build_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::filesystem("read directory", build_dir, e)),
    };

    let mut removed = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::filesystem("read directory", build_dir, e))?;
        let path = entry.path();

        if entry.file_name() == MARKER_FILE {
            continue;
        }

        let meta = fs::symlink_metadata(&path)
            .map_err(|e| Error::filesystem("inspect file", &path, e))?;
        if meta.is_dir() {
            continue;
        }

        fs::remove_file(&path).map_err(|e| Error::filesystem("remove file", &path, e))?;
        tracing::debug!("Deleted: {}", path.display());
        removed.push(path);
    }

    removed.sort();
    Ok(removed)
}

/// Cleans the build directory, then runs the bundler with one development fallback.
///
/// # Errors
///
/// Returns [`Error::BundlerFailed`] carrying both failure descriptions when the
/// production and development invocations both fail, or a filesystem error
/// from cleaning.
pub async fn invoke(
    bundler: &dyn Bundler,
    build_dir: &Path,
    reporter: &dyn Reporter,
) -> Result<InvocationReport> {
    reporter.info(Stage::Clean, "Cleaning build directory");
    let removed = clean_build_dir(build_dir)?;
    for path in &removed {
        reporter.emit(Event::new(Level::Info, Stage::Clean, "Deleted").with_path(path));
    }

    reporter.info(
        Stage::Bundle,
        &format!("Running `{}`", bundler.describe(BuildMode::Production)),
    );
    let primary = match bundler.bundle(BuildMode::Production).await {
        Ok(()) => {
            reporter.success(Stage::Bundle, "Build process completed successfully");
            return Ok(InvocationReport {
                mode: BuildMode::Production,
                removed,
                primary_failure: None,
            });
        }
        Err(e) => e.to_string(),
    };

    tracing::warn!("Production build failed: {}", primary);
    reporter.error(Stage::Bundle, &format!("Build command failed: {primary}"));
    reporter.info(
        Stage::Bundle,
        &format!(
            "Trying to build without minification: `{}`",
            bundler.describe(BuildMode::Development)
        ),
    );

    match bundler.bundle(BuildMode::Development).await {
        Ok(()) => {
            reporter.warn(
                Stage::Bundle,
                "Build process completed with development mode (unminified)",
            );
            Ok(InvocationReport {
                mode: BuildMode::Development,
                removed,
                primary_failure: Some(primary),
            })
        }
        Err(e) => {
            let fallback = e.to_string();
            reporter.error(Stage::Bundle, &format!("Development build failed: {fallback}"));
            Err(Error::BundlerFailed { primary, fallback })
        }
    }
}
