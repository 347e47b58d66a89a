//! Validate command implementation.
//!
//! Scans the plugin entry file without building. Unlike the check inside
//! `package`, the standalone command exits non-zero on any finding, even when
//! structure checking is advisory.

use super::common::{GlobalOptions, print_summary, report_failure};
use anyhow::Result;
use wpp_core::cli::ExitCode;

/// Runs the validate command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub async fn run(options: &GlobalOptions) -> Result<ExitCode> {
    let pipeline = options.pipeline()?;

    match pipeline.validate() {
        Ok(report) => {
            print_summary(&report, options.format)?;
            if report.is_valid() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::ERROR)
            }
        }
        Err(e) => Ok(report_failure(&e, options.format)),
    }
}
