//! `wp-packager`: builds and zips a WordPress plugin with a React front end.
//!
//! # Examples
//!
//! ```bash
//! # Build, validate, and zip the plugin in the current directory
//! wp-packager
//!
//! # Only rebuild the front end, failing on missing assets
//! wp-packager --strict build
//!
//! # Machine-readable summary for CI
//! wp-packager --format json package
//! ```

use anyhow::Result;
use clap::Parser;
use wpp_cli::cli::Cli;
use wpp_cli::runner::{execute_command, init_logging};
use wpp_core::cli::OutputFormat;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let exit_code = execute_command(cli, output_format).await?;

    std::process::exit(exit_code.as_i32());
}
