//! WordPress plugin packager CLI library.
//!
//! Exposes the argument definitions, command implementations, and output
//! helpers of the `wp-packager` binary so they can be tested.

#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]

pub mod actions;
pub mod cli;
pub mod commands;
pub mod formatters;
pub mod reporter;
pub mod runner;

pub use actions::ConfigAction;
pub use cli::{Cli, Commands};
