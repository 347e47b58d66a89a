//! Packaging stages for a WordPress plugin with a bundled React front end.
//!
//! Each stage is a plain function over a [`PluginLayout`](wpp_core::PluginLayout)
//! that reports progress through a [`Reporter`](wpp_core::Reporter). The
//! [`Pipeline`] type strings them together in the order the `wp-packager`
//! binary runs them:
//!
//! 1. [`probe`]: minifier and sibling-folder checks (warnings only)
//! 2. [`provision`]: required directories and listing-prevention markers
//! 3. [`seed`]: placeholder stylesheet and script
//! 4. [`bundler`]: build directory cleanup and bundler invocation with fallback
//! 5. [`verify`]: hashed script and stylesheet presence
//! 6. [`validate`]: duplicate handler declarations in the entry file
//! 7. [`archive`]: atomic zip of the plugin root
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use wpp_core::{PackagerConfig, TracingReporter};
//! use wpp_pipeline::Pipeline;
//!
//! # async fn example() -> wpp_core::Result<()> {
//! let pipeline = Pipeline::from_config(".", PackagerConfig::default(), Arc::new(TracingReporter))?;
//! let report = pipeline.package().await?;
//! println!("wrote {} ({} bytes)", report.archive.path.display(), report.archive.bytes);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod archive;
pub mod bundler;
mod pipeline;
pub mod probe;
pub mod provision;
pub mod seed;
pub mod validate;
pub mod verify;

pub use archive::{ArchiveReport, write_archive};
pub use bundler::{Bundler, CommandBundler, InvocationError, InvocationReport};
pub use pipeline::{BuildReport, PackageReport, Pipeline};
pub use probe::ProbeReport;
pub use provision::ProvisionReport;
pub use validate::{DeclarationScanner, HandlerInventory, PrefixPatternScanner, ValidationReport};
pub use verify::BuildOutput;
