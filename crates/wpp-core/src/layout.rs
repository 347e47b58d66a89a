//! Resolved on-disk layout of the plugin project.
//!
//! [`PluginLayout`] turns a [`PackagerConfig`] into concrete paths once, so
//! every pipeline stage works from the same directory list.
//!
//! ```text
//! project/
//! ├── names-fusion-plugin.zip        # distribution archive
//! └── names-fusion/                  # plugin root
//!     ├── index.php                  # marker
//!     ├── names-fusion.php           # server entry file
//!     ├── css/{index.php,names-fusion.css}
//!     ├── js/{index.php,names-fusion.js}
//!     └── react-build/
//!         ├── index.php
//!         └── assets/{index.php,index.<hash>.js,index.<hash>.css}
//! ```

use crate::{PackagerConfig, PluginId, Result};
use std::path::{Path, PathBuf};

/// Listing-prevention marker placed in every served directory.
pub const MARKER_FILE: &str = "index.php";

/// Content of [`MARKER_FILE`].
pub const MARKER_CONTENT: &str = "<?php // Silence is golden.";

/// A placeholder file created only when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAsset {
    /// Target file
    pub path: PathBuf,
    /// Placeholder content
    pub content: String,
}

/// Concrete paths for one plugin project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginLayout {
    plugin_id: PluginId,
    display_name: String,
    project_root: PathBuf,
    plugin_root: PathBuf,
    build_dir: PathBuf,
    assets_dir: PathBuf,
    css_dir: PathBuf,
    js_dir: PathBuf,
    archive_path: PathBuf,
}

impl PluginLayout {
    /// Resolves the layout of `project_root` under `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    ///
    /// # Examples
    ///
    /// ```
    /// use wpp_core::{PackagerConfig, PluginLayout};
    /// use std::path::Path;
    ///
    /// let layout = PluginLayout::new("/srv/site", &PackagerConfig::default()).unwrap();
    /// assert_eq!(
    ///     layout.assets_dir(),
    ///     Path::new("/srv/site/names-fusion/react-build/assets")
    /// );
    /// assert_eq!(layout.required_dirs().len(), 5);
    /// ```
    pub fn new(project_root: impl AsRef<Path>, config: &PackagerConfig) -> Result<Self> {
        config.validate()?;

        let project_root = project_root.as_ref().to_path_buf();
        let plugin_id = config.plugin.id.clone();
        let plugin_root = project_root.join(plugin_id.as_str());
        let build_dir = plugin_root.join(&config.layout.build_dir);
        let assets_dir = build_dir.join(&config.layout.assets_dir);

        Ok(Self {
            display_name: config.display_name(),
            css_dir: plugin_root.join(&config.layout.css_dir),
            js_dir: plugin_root.join(&config.layout.js_dir),
            archive_path: project_root.join(config.archive_file_name()),
            plugin_id,
            project_root,
            plugin_root,
            build_dir,
            assets_dir,
        })
    }

    /// Plugin identifier.
    #[must_use]
    pub const fn plugin_id(&self) -> &PluginId {
        &self.plugin_id
    }

    /// Human-readable plugin name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Directory holding the plugin root, bundler config, and archive.
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// `<project>/<id>`.
    #[must_use]
    pub fn plugin_root(&self) -> &Path {
        &self.plugin_root
    }

    /// Bundler output directory.
    #[must_use]
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Hashed asset directory inside the build directory.
    #[must_use]
    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Stylesheet directory.
    #[must_use]
    pub fn css_dir(&self) -> &Path {
        &self.css_dir
    }

    /// Script directory.
    #[must_use]
    pub fn js_dir(&self) -> &Path {
        &self.js_dir
    }

    /// Distribution archive path.
    #[must_use]
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// `<plugin-root>/<id>.php`.
    #[must_use]
    pub fn entry_file(&self) -> PathBuf {
        self.plugin_root.join(format!("{}.php", self.plugin_id))
    }

    /// Directories that must exist and carry a marker, parents first.
    #[must_use]
    pub fn required_dirs(&self) -> Vec<&Path> {
        vec![
            self.plugin_root.as_path(),
            self.build_dir.as_path(),
            self.assets_dir.as_path(),
            self.css_dir.as_path(),
            self.js_dir.as_path(),
        ]
    }

    /// Marker path inside `dir`.
    #[must_use]
    pub fn marker_path(dir: &Path) -> PathBuf {
        dir.join(MARKER_FILE)
    }

    /// Baseline stylesheet and script.
    #[must_use]
    pub fn seed_assets(&self) -> Vec<SeedAsset> {
        vec![
            SeedAsset {
                path: self.css_dir.join(format!("{}.css", self.plugin_id)),
                content: format!("/* {} Styles */", self.display_name),
            },
            SeedAsset {
                path: self.js_dir.join(format!("{}.js", self.plugin_id)),
                content: format!("/* {} jQuery Script */", self.display_name),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArchiveConfig;

    fn layout() -> PluginLayout {
        PluginLayout::new("/work", &PackagerConfig::default()).unwrap()
    }

    #[test]
    fn test_default_paths() {
        let layout = layout();

        assert_eq!(layout.plugin_root(), Path::new("/work/names-fusion"));
        assert_eq!(layout.build_dir(), Path::new("/work/names-fusion/react-build"));
        assert_eq!(layout.css_dir(), Path::new("/work/names-fusion/css"));
        assert_eq!(layout.js_dir(), Path::new("/work/names-fusion/js"));
        assert_eq!(
            layout.entry_file(),
            PathBuf::from("/work/names-fusion/names-fusion.php")
        );
        assert_eq!(
            layout.archive_path(),
            Path::new("/work/names-fusion-plugin.zip")
        );
    }

    #[test]
    fn test_required_dirs_order_parents_first() {
        let layout = layout();
        let dirs = layout.required_dirs();

        assert_eq!(dirs[0], layout.plugin_root());
        let build_pos = dirs.iter().position(|d| *d == layout.build_dir()).unwrap();
        let assets_pos = dirs.iter().position(|d| *d == layout.assets_dir()).unwrap();
        assert!(build_pos < assets_pos);
        assert!(dirs.iter().all(|d| d.starts_with(layout.plugin_root())));
    }

    #[test]
    fn test_seed_assets_content() {
        let seeds = layout().seed_assets();

        assert_eq!(seeds.len(), 2);
        assert!(seeds[0].path.ends_with("css/names-fusion.css"));
        assert_eq!(seeds[0].content, "/* Names Fusion Styles */");
        assert!(seeds[1].path.ends_with("js/names-fusion.js"));
        assert_eq!(seeds[1].content, "/* Names Fusion jQuery Script */");
    }

    #[test]
    fn test_custom_archive_name() {
        let config = PackagerConfig {
            archive: ArchiveConfig {
                file_name: Some("dist.zip".to_string()),
                ..ArchiveConfig::default()
            },
            ..PackagerConfig::default()
        };
        let layout = PluginLayout::new("/work", &config).unwrap();
        assert_eq!(layout.archive_path(), Path::new("/work/dist.zip"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PackagerConfig::default();
        config.layout.assets_dir = "../escape".to_string();
        assert!(PluginLayout::new("/work", &config).is_err());
    }

    #[test]
    fn test_marker_path() {
        assert_eq!(
            PluginLayout::marker_path(Path::new("/work/names-fusion/css")),
            PathBuf::from("/work/names-fusion/css/index.php")
        );
    }
}
