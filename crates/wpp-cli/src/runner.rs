//! Command execution and runtime logic.
//!
//! Contains the main command dispatch and logging initialization.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wpp_core::cli::{ExitCode, OutputFormat};

use crate::cli::{Cli, Commands};
use crate::commands::{self, common::GlobalOptions};

/// Initializes logging infrastructure.
///
/// Sets up tracing on stderr with `debug` when `verbose` is set, otherwise
/// `RUST_LOG` or `info`.
///
/// # Errors
///
/// Returns an error if logging initialization fails.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

/// Executes the command selected on the command line.
///
/// Pipeline failures are reported and turned into [`ExitCode::ERROR`];
/// configuration and argument problems are returned as errors.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or written.
pub async fn execute_command(cli: Cli, output_format: OutputFormat) -> Result<ExitCode> {
    let command = cli.command_or_default();
    let options = GlobalOptions {
        project_dir: cli.project_dir,
        config: cli.config,
        strict: cli.strict,
        format: output_format,
    };

    match command {
        Commands::Package => commands::package::run(&options).await,
        Commands::Build => commands::build::run(&options).await,
        Commands::Validate => commands::validate::run(&options).await,
        Commands::Config { action } => commands::config::run(action, &options).await,
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd).await
        }
    }
}
