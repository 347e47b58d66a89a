//! Package command implementation.
//!
//! Runs the full pipeline: build, structure validation, and archive.

use super::common::{GlobalOptions, print_summary, report_failure};
use anyhow::Result;
use colored::Colorize;
use std::fmt::Write as _;
use tracing::info;
use wpp_core::cli::{ExitCode, OutputFormat};
use wpp_pipeline::PackageReport;

/// Runs the package command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded. Pipeline failures
/// are reported and yield [`ExitCode::ERROR`].
pub async fn run(options: &GlobalOptions) -> Result<ExitCode> {
    let pipeline = options.pipeline()?;
    info!(
        "Preparing {} WordPress plugin",
        pipeline.layout().display_name()
    );

    match pipeline.package().await {
        Ok(report) => {
            if options.format == OutputFormat::Pretty {
                println!("{}", render_instructions(&report));
            } else {
                print_summary(&report, options.format)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_failure(&e, options.format)),
    }
}

/// Human-readable closing summary with installation steps.
#[must_use]
pub fn render_instructions(report: &PackageReport) -> String {
    let file_name = report
        .archive
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n📦 File: {} ({} bytes, {} entries)",
        file_name.bold(),
        report.archive.bytes,
        report.archive.entries
    );
    let _ = writeln!(out, "   Built at {}", report.built_at.to_rfc3339());

    let _ = writeln!(out, "\n{}", "Installation instructions:".bold());
    for (i, step) in report.install_steps.iter().enumerate() {
        let _ = writeln!(out, "{}. {step}", i + 1);
    }

    let _ = writeln!(out, "\n{}", "Troubleshooting:".bold());
    for hint in &report.troubleshooting {
        let _ = writeln!(out, "- {hint}");
    }

    out.trim_end().to_string()
}
