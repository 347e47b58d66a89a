//! Core types, configuration, and errors for the WordPress plugin packager.
//!
//! This crate provides the foundational types shared by the pipeline and the
//! CLI so that the plugin identifier and directory layout are declared once.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`PluginId`, `CheckMode`, `BuildMode`)
//! - Error hierarchy with a machine-readable [`ErrorKind`]
//! - The TOML configuration model ([`PackagerConfig`])
//! - The resolved on-disk layout ([`PluginLayout`])
//! - A structured, leveled event stream ([`Event`], [`Reporter`])
//!
//! # Examples
//!
//! ```
//! use wpp_core::{PackagerConfig, PluginLayout};
//!
//! let config = PackagerConfig::default();
//! let layout = PluginLayout::new("/srv/project", &config).unwrap();
//!
//! assert!(layout.plugin_root().ends_with("names-fusion"));
//! assert!(layout.archive_path().ends_with("names-fusion-plugin.zip"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod cli;
pub mod config;
mod error;
pub mod event;
mod layout;
mod types;

pub use config::PackagerConfig;
pub use error::{Error, ErrorKind, Result};
pub use event::{Event, Level, MemoryReporter, Reporter, Stage, TracingReporter};
pub use layout::{MARKER_CONTENT, MARKER_FILE, PluginLayout, SeedAsset};
pub use types::{BuildMode, CheckMode, PluginId};
