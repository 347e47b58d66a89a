//! Build command implementation.

use super::common::{GlobalOptions, print_summary, report_failure};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use wpp_core::BuildMode;
use wpp_core::cli::ExitCode;
use wpp_pipeline::BuildReport;

/// Condensed result of a build.
#[derive(Debug, Serialize)]
pub struct BuildSummary {
    /// Plugin identifier
    pub plugin_id: String,
    /// Mode of the successful bundler run
    pub mode: BuildMode,
    /// Hashed script assets
    pub scripts: Vec<String>,
    /// Hashed stylesheet assets
    pub stylesheets: Vec<String>,
    /// Missing output tolerated under advisory checking
    pub problems: Vec<String>,
    /// Stale files removed before bundling
    pub removed: usize,
    /// Placeholder assets created
    pub seeded: Vec<PathBuf>,
}

impl BuildSummary {
    /// Condenses a build report.
    #[must_use]
    pub fn new(plugin_id: &str, report: &BuildReport) -> Self {
        Self {
            plugin_id: plugin_id.to_string(),
            mode: report.invocation.mode,
            scripts: report.output.scripts.clone(),
            stylesheets: report.output.stylesheets.clone(),
            problems: report.output.problems(),
            removed: report.invocation.removed.len(),
            seeded: report.seeded.clone(),
        }
    }
}

/// Runs the build command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub async fn run(options: &GlobalOptions) -> Result<ExitCode> {
    let pipeline = options.pipeline()?;

    match pipeline.build().await {
        Ok(report) => {
            let summary = BuildSummary::new(pipeline.layout().plugin_id().as_str(), &report);
            print_summary(&summary, options.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_failure(&e, options.format)),
    }
}
