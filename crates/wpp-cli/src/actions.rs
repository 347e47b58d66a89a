//! Subcommand actions.

use clap::Subcommand;

/// Configuration file actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,

    /// Write a configuration file with the default settings.
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path and whether it exists.
    Path,
}
