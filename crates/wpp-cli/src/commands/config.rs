//! Config command implementation.
//!
//! Shows, creates, and locates `wp-packager.toml`.

use super::common::{GlobalOptions, print_summary};
use crate::actions::ConfigAction;
use anyhow::{Context, Result, bail};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use wpp_core::PackagerConfig;
use wpp_core::cli::{ExitCode, OutputFormat};

/// Location of the configuration file.
#[derive(Debug, Serialize)]
pub struct ConfigLocation {
    /// Configuration file path
    pub path: PathBuf,
    /// Whether the file exists
    pub exists: bool,
}

/// Runs the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, or if `init` finds
/// an existing file without `--force` or cannot write the file.
pub async fn run(action: ConfigAction, options: &GlobalOptions) -> Result<ExitCode> {
    match action {
        ConfigAction::Show => show(options),
        ConfigAction::Init { force } => init(options, force),
        ConfigAction::Path => path(options),
    }
}

fn show(options: &GlobalOptions) -> Result<ExitCode> {
    let config = options.load_config()?;

    if options.format == OutputFormat::Pretty {
        print!("{}", config.to_toml()?);
    } else {
        print_summary(&config, options.format)?;
    }

    Ok(ExitCode::SUCCESS)
}

fn init(options: &GlobalOptions, force: bool) -> Result<ExitCode> {
    let path = options.config_path();

    if path.exists() && !force {
        bail!(
            "configuration file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    let content = PackagerConfig::default().to_toml()?;
    fs::write(&path, content)
        .with_context(|| format!("failed to write configuration file {}", path.display()))?;
    info!("Wrote default configuration to {}", path.display());

    if options.format == OutputFormat::Pretty {
        println!("{} Created {}", "✓".green(), path.display());
    } else {
        print_summary(&ConfigLocation { path, exists: true }, options.format)?;
    }

    Ok(ExitCode::SUCCESS)
}

fn path(options: &GlobalOptions) -> Result<ExitCode> {
    let path = options.config_path();
    let exists = path.exists();

    if options.format == OutputFormat::Pretty {
        let note = if exists {
            "exists".green()
        } else {
            "not found, defaults apply".yellow()
        };
        println!("{} ({note})", path.display());
    } else {
        print_summary(&ConfigLocation { path, exists }, options.format)?;
    }

    Ok(ExitCode::SUCCESS)
}
