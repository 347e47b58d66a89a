//! Command implementations for the packager CLI.
//!
//! Each command module loads the configuration, runs its part of the
//! pipeline, and prints a summary in the requested output format.

pub mod build;
pub mod common;
pub mod completions;
pub mod config;
pub mod package;
pub mod validate;
