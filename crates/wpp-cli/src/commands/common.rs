//! Shared helpers for command implementations.

use crate::formatters::format_output;
use crate::reporter;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use wpp_core::cli::{ExitCode, OutputFormat};
use wpp_core::{ErrorKind, PackagerConfig};
use wpp_pipeline::Pipeline;

/// Flags shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalOptions {
    /// Project root
    pub project_dir: PathBuf,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Force both checks to strict mode
    pub strict: bool,
    /// Output format for summaries
    pub format: OutputFormat,
}

impl GlobalOptions {
    /// Creates options for `project_dir` with defaults for everything else.
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            config: None,
            strict: false,
            format: OutputFormat::default(),
        }
    }

    /// Configuration file in effect, whether or not it exists.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PackagerConfig::default_path(&self.project_dir))
    }

    /// Loads the configuration and applies `--strict`.
    ///
    /// An explicit `--config` file must exist; the project default may be absent.
    pub fn load_config(&self) -> Result<PackagerConfig> {
        let config = match &self.config {
            Some(path) => PackagerConfig::load(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?,
            None => {
                PackagerConfig::discover(&self.project_dir)
                    .context("failed to load project configuration")?
                    .0
            }
        };

        Ok(if self.strict { config.strict() } else { config })
    }

    /// Builds the pipeline with the reporter matching the output format.
    pub fn pipeline(&self) -> Result<Pipeline> {
        let config = self.load_config()?;
        Pipeline::from_config(&self.project_dir, config, reporter::for_format(self.format))
            .context("invalid packager configuration")
    }
}

/// Machine-readable failure summary.
#[derive(Debug, Serialize)]
struct FailureSummary {
    status: &'static str,
    kind: ErrorKind,
    message: String,
}

/// Reports a pipeline failure and returns [`ExitCode::ERROR`].
#[must_use]
pub fn report_failure(err: &wpp_core::Error, format: OutputFormat) -> ExitCode {
    tracing::debug!("Pipeline failed: {err:?}");

    if format.is_machine_readable() {
        let summary = FailureSummary {
            status: "failed",
            kind: err.kind(),
            message: err.to_string(),
        };
        match format_output(&summary, format) {
            Ok(out) => println!("{out}"),
            Err(e) => tracing::error!("Failed to format error summary: {e}"),
        }
    } else {
        eprintln!("{} {}", "✗".red(), err.to_string().red());
        if err.is_validation_error() {
            eprintln!("Plugin structure validation failed. Please fix the issues before packaging.");
        }
    }

    ExitCode::ERROR
}

/// Prints a command summary in `format`.
pub fn print_summary<T: Serialize>(data: &T, format: OutputFormat) -> Result<()> {
    println!("{}", format_output(data, format)?);
    Ok(())
}
