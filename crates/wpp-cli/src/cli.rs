//! CLI argument definitions and parsing.
//!
//! Defines the command-line interface structure using clap:
//! - `Cli` - Main CLI entry point and global flags
//! - `Commands` - Available subcommands

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::actions::ConfigAction;

/// Build, validate, and zip a WordPress plugin with a bundled React front end.
///
/// Without a subcommand, runs the full `package` pipeline.
#[derive(Parser, Debug)]
#[command(name = "wp-packager")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute (default: package)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project root containing the plugin directory and bundler config
    #[arg(long, global = true, default_value = ".", env = "WP_PACKAGER_PROJECT_DIR")]
    pub project_dir: PathBuf,

    /// Configuration file (default: <project-dir>/wp-packager.toml)
    #[arg(long, global = true, env = "WP_PACKAGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fail on missing build output as well as on structure problems
    #[arg(long, global = true)]
    pub strict: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    pub format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Build the front end, validate the plugin, and write the zip archive.
    ///
    /// # Examples
    ///
    /// ```bash
    /// wp-packager package
    /// # ✓ JavaScript assets found: index.3f2a1c.js
    /// # ✓ CSS assets found: index.9b8e7d.css
    /// # ✓ Plugin zip created successfully (48213 bytes)
    /// ```
    Package,

    /// Provision directories, seed assets, and run the bundler.
    ///
    /// Clears stale files from the build directory, runs the bundler in
    /// production mode with a single development-mode retry, and verifies
    /// that scripts and stylesheets were produced.
    Build,

    /// Check the plugin entry file for duplicate handler declarations.
    Validate,

    /// Inspect or create the packager configuration file.
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions.
    ///
    /// Generates completion scripts for various shells that can be
    /// sourced or saved to enable tab completion for this CLI.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the subcommand, defaulting to [`Commands::Package`].
    #[must_use]
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Package)
    }
}
