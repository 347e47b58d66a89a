//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io;
use tracing::info;
use wpp_core::cli::ExitCode;

/// Writes the completion script for `shell` to stdout.
///
/// # Examples
///
/// ```no_run
/// use clap::CommandFactory;
/// use clap_complete::Shell;
/// use wpp_cli::Cli;
/// use wpp_cli::commands::completions;
///
/// completions::generate_completions(Shell::Bash, &mut Cli::command());
/// ```
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, &mut io::stdout());
}

/// Runs the completions command.
///
/// # Errors
///
/// Never fails; the `Result` matches the other commands.
pub async fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    info!("Generating {shell} completions");
    generate_completions(shell, cmd);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::CommandFactory;

    #[test]
    fn test_generate_completions_for_every_shell() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            generate_completions(shell, &mut Cli::command());
        }
    }

    #[tokio::test]
    async fn test_run_returns_success() {
        let result = run(Shell::Bash, &mut Cli::command()).await;
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    }
}
