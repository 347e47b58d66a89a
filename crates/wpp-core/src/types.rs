//! Domain types for the plugin packager.
//!
//! # Examples
//!
//! ```
//! use wpp_core::{CheckMode, PluginId};
//!
//! let id = PluginId::new("names-fusion").unwrap();
//! assert_eq!(id.handler_prefix(), "names_fusion_");
//! assert_eq!(id.display_name(), "Names Fusion");
//!
//! let mode: CheckMode = "strict".parse().unwrap();
//! assert!(mode.is_strict());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// WordPress plugin identifier (the plugin "slug").
///
/// The identifier names the plugin root directory, the server entry file
/// (`<id>.php`), and the top-level folder inside the distribution archive.
/// WordPress resolves the plugin by this name, so it must be a slug:
/// - Start with a lowercase letter or digit
/// - Contain only lowercase letters, digits, hyphens, and underscores
/// - Be 1-64 characters
///
/// # Examples
///
/// ```
/// use wpp_core::PluginId;
///
/// assert!(PluginId::new("names-fusion").is_ok());
/// assert!(PluginId::new("Names-Fusion").is_err());
/// assert!(PluginId::new("../escape").is_err());
/// assert!(PluginId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginId(pub(crate) String);

impl PluginId {
    /// Creates a validated plugin identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the identifier is not a valid slug.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();

        if id.is_empty() || id.len() > 64 {
            return Err(Error::ConfigError {
                message: format!("plugin id must be 1-64 characters, got {}", id.len()),
            });
        }

        if !id
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(Error::ConfigError {
                message: format!("plugin id '{id}' must start with a lowercase letter or digit"),
            });
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(Error::ConfigError {
                message: format!(
                    "plugin id '{id}' must contain only lowercase letters, digits, hyphens, and underscores"
                ),
            });
        }

        Ok(Self(id.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the PHP function-name prefix used for handler declarations.
    ///
    /// Hyphens are not legal in PHP identifiers, so they become underscores.
    ///
    /// # Examples
    ///
    /// ```
    /// use wpp_core::PluginId;
    ///
    /// let id = PluginId::new("names-fusion").unwrap();
    /// assert_eq!(id.handler_prefix(), "names_fusion_");
    /// ```
    #[must_use]
    pub fn handler_prefix(&self) -> String {
        format!("{}_", self.0.replace('-', "_"))
    }

    /// Returns a human-readable title derived from the identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use wpp_core::PluginId;
    ///
    /// let id = PluginId::new("names-fusion").unwrap();
    /// assert_eq!(id.display_name(), "Names Fusion");
    /// ```
    #[must_use]
    pub fn display_name(&self) -> String {
        self.tokens()
            .map(|word| {
                let mut chars = word.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_ascii_uppercase().to_string() + chars.as_str()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns the words of the identifier, split on `-` and `_`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wpp_core::PluginId;
    ///
    /// let id = PluginId::new("names-fusion").unwrap();
    /// assert_eq!(id.tokens().collect::<Vec<_>>(), vec!["names", "fusion"]);
    /// ```
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(['-', '_']).filter(|t| !t.is_empty())
    }

    /// Returns the default archive file name, `<id>-plugin.zip`.
    #[must_use]
    pub fn default_archive_name(&self) -> String {
        format!("{}-plugin.zip", self.0)
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PluginId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PluginId> for String {
    fn from(id: PluginId) -> Self {
        id.0
    }
}

impl AsRef<str> for PluginId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How a check reacts to its findings.
///
/// Build-output verification defaults to [`CheckMode::Advisory`] and
/// structure validation to [`CheckMode::Strict`]; both are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    /// Findings abort the pipeline
    #[default]
    Strict,
    /// Findings are reported as error events and the pipeline continues
    Advisory,
}

impl CheckMode {
    /// Returns `true` if findings abort the pipeline.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }

    /// Returns the string representation of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Advisory => "advisory",
        }
    }
}

impl fmt::Display for CheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "advisory" => Ok(Self::Advisory),
            _ => Err(Error::InvalidArgument(format!(
                "invalid check mode: '{s}' (expected: strict or advisory)"
            ))),
        }
    }
}

/// Bundler invocation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Minified output using the configured bundler arguments
    Production,
    /// Unminified output; the fallback when the production build fails
    Development,
}

impl BuildMode {
    /// Returns the string representation of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_id_valid() {
        for id in ["names-fusion", "a", "plugin_2", "0day-tools"] {
            assert!(PluginId::new(id).is_ok(), "{id} should be valid");
        }
    }

    #[test]
    fn test_plugin_id_invalid() {
        for id in [
            "",
            "-leading",
            "Upper",
            "has space",
            "sub/dir",
            "..",
            "dot.ted",
        ] {
            let err = PluginId::new(id).unwrap_err();
            assert!(err.is_config_error(), "{id} should be rejected");
        }

        assert!(PluginId::new("a".repeat(65)).is_err());
    }

    #[test]
    fn test_handler_prefix() {
        let id = PluginId::new("my-cool_plugin").unwrap();
        assert_eq!(id.handler_prefix(), "my_cool_plugin_");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(PluginId::new("names-fusion").unwrap().display_name(), "Names Fusion");
        assert_eq!(PluginId::new("seo_kit").unwrap().display_name(), "Seo Kit");
        assert_eq!(PluginId::new("a--b").unwrap().display_name(), "A B");
    }

    #[test]
    fn test_default_archive_name() {
        let id = PluginId::new("names-fusion").unwrap();
        assert_eq!(id.default_archive_name(), "names-fusion-plugin.zip");
    }

    #[test]
    fn test_plugin_id_deserialize_validates() {
        #[derive(Deserialize)]
        struct Wrapper {
            id: PluginId,
        }

        let ok: Wrapper = toml::from_str("id = \"names-fusion\"").unwrap();
        assert_eq!(ok.id.as_str(), "names-fusion");

        assert!(toml::from_str::<Wrapper>("id = \"Bad Name\"").is_err());
    }

    #[test]
    fn test_check_mode_parse() {
        assert_eq!("strict".parse::<CheckMode>().unwrap(), CheckMode::Strict);
        assert_eq!("ADVISORY".parse::<CheckMode>().unwrap(), CheckMode::Advisory);
        assert!("lenient".parse::<CheckMode>().is_err());
    }

    #[test]
    fn test_check_mode_default_is_strict() {
        assert!(CheckMode::default().is_strict());
        assert!(!CheckMode::Advisory.is_strict());
    }

    #[test]
    fn test_build_mode_display() {
        assert_eq!(BuildMode::Production.to_string(), "production");
        assert_eq!(BuildMode::Development.to_string(), "development");
    }
}
