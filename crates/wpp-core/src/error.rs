//! Error types for the plugin packager.
//!
//! Every failure the pipeline can produce is a variant of [`Error`]. Callers
//! that need to branch on the failure category use [`Error::kind`] instead of
//! matching on message text.
//!
//! # Examples
//!
//! ```
//! use wpp_core::{Error, ErrorKind, Result};
//!
//! fn check_handlers(distinct: &[&str], total: usize) -> Result<()> {
//!     if distinct.len() != total {
//!         return Err(Error::DuplicateHandlers {
//!             distinct: distinct.iter().map(ToString::to_string).collect(),
//!             duplicates: vec!["names_fusion_shortcode".to_string()],
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_handlers(&["names_fusion_shortcode"], 2).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Validation);
//! ```

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for the packager.
#[derive(Error, Debug)]
pub enum Error {
    /// A directory or file could not be created, read, or removed.
    ///
    /// Always fatal: later stages assume the filesystem state exists.
    #[error("failed to {action} {}: {source}", path.display())]
    Filesystem {
        /// What was being attempted (e.g. "create directory")
        action: String,
        /// Path the operation targeted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The bundler failed in production mode and again in development mode.
    #[error("front-end build failed: {primary}; development fallback also failed: {fallback}")]
    BundlerFailed {
        /// Failure of the production (minified) invocation
        primary: String,
        /// Failure of the development (unminified) retry
        fallback: String,
    },

    /// The server entry file does not exist.
    #[error("plugin entry file not found: {}", path.display())]
    MissingEntryFile {
        /// Expected location of `<plugin-id>.php`
        path: PathBuf,
    },

    /// A handler function is declared more than once in the entry file.
    #[error(
        "duplicate handler declarations: {}; handlers found: {}",
        duplicates.join(", "),
        distinct.join(", ")
    )]
    DuplicateHandlers {
        /// Every distinct handler name, in order of first declaration
        distinct: Vec<String>,
        /// Names declared more than once
        duplicates: Vec<String>,
    },

    /// Build verification found missing output under strict checking.
    #[error("build output incomplete: {}", problems.join("; "))]
    BuildOutputIncomplete {
        /// One entry per missing directory or asset category
        problems: Vec<String>,
    },

    /// Writing or finalizing the distribution archive failed.
    #[error("archive error for {}: {message}", path.display())]
    Archive {
        /// Archive being written
        path: PathBuf,
        /// Description of the failure
        message: String,
        /// Underlying codec or I/O error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration values are invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// The configuration file is not valid TOML for the expected schema.
    #[error("failed to parse configuration file {}: {source}", path.display())]
    ConfigParse {
        /// Configuration file path
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Failure category, stable across message wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Directory or file operation failed
    Filesystem,
    /// External bundler failed
    Bundler,
    /// Plugin structure or build output check failed
    Validation,
    /// Archive creation failed
    Archive,
    /// Configuration or argument problem
    Config,
}

impl ErrorKind {
    /// Returns the snake_case name used in machine-readable output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Filesystem => "filesystem",
            Self::Bundler => "bundler",
            Self::Validation => "validation",
            Self::Archive => "archive",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Builds a [`Error::Filesystem`] from an I/O error.
    ///
    /// # Examples
    ///
    /// ```
    /// use wpp_core::{Error, ErrorKind};
    /// use std::io;
    ///
    /// let err = Error::filesystem(
    ///     "create directory",
    ///     "/plugins/names-fusion/css",
    ///     io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    /// );
    /// assert_eq!(err.kind(), ErrorKind::Filesystem);
    /// assert!(err.to_string().contains("create directory"));
    /// ```
    pub fn filesystem(
        action: impl Into<String>,
        path: impl AsRef<Path>,
        source: std::io::Error,
    ) -> Self {
        Self::Filesystem {
            action: action.into(),
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Builds a [`Error::Archive`] wrapping a codec or I/O error.
    pub fn archive<E>(path: impl AsRef<Path>, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Archive {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Filesystem { .. } => ErrorKind::Filesystem,
            Self::BundlerFailed { .. } => ErrorKind::Bundler,
            Self::MissingEntryFile { .. }
            | Self::DuplicateHandlers { .. }
            | Self::BuildOutputIncomplete { .. } => ErrorKind::Validation,
            Self::Archive { .. } => ErrorKind::Archive,
            Self::ConfigError { .. } | Self::ConfigParse { .. } | Self::InvalidArgument(_) => {
                ErrorKind::Config
            }
        }
    }

    /// Returns `true` if this is a plugin structure or build output failure.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation)
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Config)
    }

    /// Returns `true` if the bundler failed in both modes.
    #[must_use]
    pub const fn is_bundler_error(&self) -> bool {
        matches!(self, Self::BundlerFailed { .. })
    }
}

/// Result type alias for packager operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_filesystem_error_display() {
        let err = Error::filesystem(
            "remove file",
            "/tmp/plugin/react-build/old.js",
            io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
        );

        let display = err.to_string();
        assert!(display.contains("remove file"));
        assert!(display.contains("old.js"));
        assert!(display.contains("access denied"));
        assert_eq!(err.kind(), ErrorKind::Filesystem);
    }

    #[test]
    fn test_filesystem_error_has_source() {
        use std::error::Error as _;

        let err = Error::filesystem(
            "read directory",
            "/missing",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_duplicate_handlers_display() {
        let err = Error::DuplicateHandlers {
            distinct: vec!["foo".to_string(), "bar".to_string()],
            duplicates: vec!["foo".to_string()],
        };

        let display = err.to_string();
        assert!(display.contains("duplicate handler declarations: foo"));
        assert!(display.contains("handlers found: foo, bar"));
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_bundler_failed_display() {
        let err = Error::BundlerFailed {
            primary: "`npx vite build` exited with status 1".to_string(),
            fallback: "`npx vite build --mode=development` exited with status 1".to_string(),
        };

        assert!(err.is_bundler_error());
        assert_eq!(err.kind(), ErrorKind::Bundler);
        assert!(err.to_string().contains("development fallback also failed"));
    }

    #[test]
    fn test_build_output_incomplete_joins_problems() {
        let err = Error::BuildOutputIncomplete {
            problems: vec![
                "no JavaScript assets".to_string(),
                "no CSS assets".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "build output incomplete: no JavaScript assets; no CSS assets"
        );
    }

    #[test]
    fn test_archive_error_kind() {
        let err = Error::archive(
            "/out/names-fusion-plugin.zip",
            "failed to finalize archive",
            io::Error::other("disk full"),
        );
        assert_eq!(err.kind(), ErrorKind::Archive);
        assert!(err.to_string().contains("failed to finalize archive"));
    }

    #[test]
    fn test_config_kinds() {
        assert!(
            Error::ConfigError {
                message: "bad".to_string()
            }
            .is_config_error()
        );
        assert!(Error::InvalidArgument("x".to_string()).is_config_error());
        assert!(
            !Error::MissingEntryFile {
                path: PathBuf::from("a.php")
            }
            .is_config_error()
        );
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::Filesystem).unwrap();
        assert_eq!(json, "\"filesystem\"");
        assert_eq!(ErrorKind::Validation.to_string(), "validation");
    }
}
