//! Packager configuration.
//!
//! Configuration is stored in TOML format at `<project>/wp-packager.toml`.
//! Every section and key is optional; a missing file means defaults that
//! package the `names-fusion` plugin with a Vite front end.
//!
//! # Examples
//!
//! ```toml
//! [plugin]
//! id = "names-fusion"
//! shortcodes = ["names_fusion", "names_fusion_react"]
//!
//! [layout]
//! build_dir = "react-build"
//! assets_dir = "assets"
//! css_dir = "css"
//! js_dir = "js"
//!
//! [bundler]
//! program = "npx"
//! args = ["vite", "build", "--config", "vite.config.wordpress.ts"]
//! fallback_args = ["--mode=development"]
//! minifier = "terser"
//!
//! [checks]
//! build_output = "advisory"
//! structure = "strict"
//!
//! [archive]
//! compression_level = 9
//! ```

use crate::{CheckMode, Error, PluginId, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// File name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "wp-packager.toml";

/// Highest deflate level accepted by the archive writer.
pub const MAX_COMPRESSION_LEVEL: u8 = 9;

/// Complete packager configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PackagerConfig {
    /// Plugin identity
    #[serde(default)]
    pub plugin: PluginConfig,

    /// Directory names inside the plugin root
    #[serde(default)]
    pub layout: LayoutConfig,

    /// External bundler invocation
    #[serde(default)]
    pub bundler: BundlerConfig,

    /// Strict/advisory behaviour of the checks
    #[serde(default)]
    pub checks: ChecksConfig,

    /// Distribution archive settings
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Plugin identity settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginConfig {
    /// Plugin slug; names the plugin root, entry file, and archive folder
    #[serde(default = "default_plugin_id")]
    pub id: PluginId,

    /// Title used in seeded placeholder assets (default: title-cased id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// PHP function prefix for handler declarations (default: derived from id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler_prefix: Option<String>,

    /// Shortcodes listed in the installation summary (default: `<id>`, `<id>_react`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcodes: Option<Vec<String>>,
}

/// Directory names relative to the plugin root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Bundler output directory
    pub build_dir: String,

    /// Hashed asset directory, relative to `build_dir`
    pub assets_dir: String,

    /// Stylesheet directory
    pub css_dir: String,

    /// Script directory
    pub js_dir: String,
}

/// Bundler command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BundlerConfig {
    /// Executable to run (resolved through `PATH`)
    pub program: String,

    /// Arguments for the production build
    pub args: Vec<String>,

    /// Extra arguments appended for the development fallback
    pub fallback_args: Vec<String>,

    /// Node package probed before building; empty disables the probe
    pub minifier: String,
}

/// Check modes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChecksConfig {
    /// Build output verification (default: advisory)
    pub build_output: CheckMode,

    /// Duplicate handler validation (default: strict)
    pub structure: CheckMode,
}

/// Archive settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Archive file name in the project root (default: `<id>-plugin.zip`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Compression level: 0 stores entries, 1-9 deflate
    pub compression_level: u8,
}

fn default_plugin_id() -> PluginId {
    PluginId(String::from("names-fusion"))
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            id: default_plugin_id(),
            display_name: None,
            handler_prefix: None,
            shortcodes: None,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            build_dir: "react-build".to_string(),
            assets_dir: "assets".to_string(),
            css_dir: "css".to_string(),
            js_dir: "js".to_string(),
        }
    }
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: ["vite", "build", "--config", "vite.config.wordpress.ts"]
                .map(String::from)
                .to_vec(),
            fallback_args: vec!["--mode=development".to_string()],
            minifier: "terser".to_string(),
        }
    }
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            build_output: CheckMode::Advisory,
            structure: CheckMode::Strict,
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            file_name: None,
            compression_level: MAX_COMPRESSION_LEVEL,
        }
    }
}

impl PackagerConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML for
    /// this schema, or fails [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::filesystem("read configuration file", path, e))?;

        let config: Self = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Loads `<project_root>/wp-packager.toml` if present, otherwise defaults.
    ///
    /// Returns the configuration and the file it came from.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn discover(project_root: impl AsRef<Path>) -> Result<(Self, Option<PathBuf>)> {
        let path = Self::default_path(project_root);

        if !path.exists() {
            debug!("Config file not found, using defaults");
            return Ok((Self::default(), None));
        }

        let config = Self::load(&path)?;
        Ok((config, Some(path)))
    }

    /// Returns the conventional configuration path for a project.
    #[must_use]
    pub fn default_path(project_root: impl AsRef<Path>) -> PathBuf {
        project_root.as_ref().join(CONFIG_FILE_NAME)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        validate_segment("layout.build_dir", &self.layout.build_dir)?;
        validate_segment("layout.assets_dir", &self.layout.assets_dir)?;
        validate_segment("layout.css_dir", &self.layout.css_dir)?;
        validate_segment("layout.js_dir", &self.layout.js_dir)?;

        if self.bundler.program.trim().is_empty() {
            return Err(config_error("bundler.program must not be empty"));
        }

        if let Some(prefix) = &self.plugin.handler_prefix {
            if prefix.is_empty()
                || !prefix
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(config_error(format!(
                    "plugin.handler_prefix '{prefix}' must be a non-empty PHP identifier prefix"
                )));
            }
        }

        if let Some(name) = &self.archive.file_name {
            validate_segment("archive.file_name", name)?;
            if !name.ends_with(".zip") {
                return Err(config_error(format!(
                    "archive.file_name '{name}' must end with .zip"
                )));
            }
        }

        if self.archive.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(config_error(format!(
                "archive.compression_level must be between 0 and {MAX_COMPRESSION_LEVEL}, got {}",
                self.archive.compression_level
            )));
        }

        Ok(())
    }

    /// Serializes the configuration as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| config_error(format!("failed to serialize: {e}")))
    }

    /// Forces both checks to [`CheckMode::Strict`].
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.checks.build_output = CheckMode::Strict;
        self.checks.structure = CheckMode::Strict;
        self
    }

    /// Returns the handler prefix, derived from the id unless configured.
    #[must_use]
    pub fn handler_prefix(&self) -> String {
        self.plugin
            .handler_prefix
            .clone()
            .unwrap_or_else(|| self.plugin.id.handler_prefix())
    }

    /// Returns the display name, derived from the id unless configured.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.plugin
            .display_name
            .clone()
            .unwrap_or_else(|| self.plugin.id.display_name())
    }

    /// Returns the shortcodes to advertise.
    ///
    /// Defaults to the classic and React shortcodes registered by the entry
    /// file: the underscored id and the same with a `_react` suffix.
    #[must_use]
    pub fn shortcodes(&self) -> Vec<String> {
        self.plugin.shortcodes.clone().unwrap_or_else(|| {
            let base = self.plugin.id.as_str().replace('-', "_");
            let react = format!("{base}_react");
            vec![base, react]
        })
    }

    /// Returns the archive file name.
    #[must_use]
    pub fn archive_file_name(&self) -> String {
        self.archive
            .file_name
            .clone()
            .unwrap_or_else(|| self.plugin.id.default_archive_name())
    }
}

fn config_error(message: impl Into<String>) -> Error {
    Error::ConfigError {
        message: message.into(),
    }
}

/// Accepts exactly one normal path component (no separators, `.` or `..`).
fn validate_segment(field: &str, value: &str) -> Result<()> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !value.contains(['/', '\\']) => Ok(()),
        _ => Err(config_error(format!(
            "{field} '{value}' must be a single directory or file name"
        ))),
    }
}
