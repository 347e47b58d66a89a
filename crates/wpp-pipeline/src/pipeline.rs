//! Stage orchestration.

use crate::archive::{ArchiveReport, write_archive};
use crate::bundler::{self, Bundler, CommandBundler, InvocationReport};
use crate::probe::{self, ProbeReport};
use crate::provision::{self, ProvisionReport};
use crate::seed;
use crate::validate::{self, DeclarationScanner, PrefixPatternScanner, ValidationReport};
use crate::verify::{self, BuildOutput};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wpp_core::{Event, Level, PackagerConfig, PluginLayout, Reporter, Result, Stage};

/// Outcome of [`Pipeline::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Environment findings
    pub probe: ProbeReport,
    /// Directories and markers created
    pub provision: ProvisionReport,
    /// Placeholder assets created
    pub seeded: Vec<PathBuf>,
    /// Cleanup and bundler outcome
    pub invocation: InvocationReport,
    /// Verified build output
    pub output: BuildOutput,
}

/// Outcome of [`Pipeline::package`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageReport {
    /// Plugin identifier, also the archive's top-level folder
    pub plugin_id: String,
    /// Written archive
    pub archive: ArchiveReport,
    /// Build stage outcome
    pub build: BuildReport,
    /// Structure validation outcome
    pub validation: ValidationReport,
    /// WordPress installation steps
    pub install_steps: Vec<String>,
    /// Hints for failed installations
    pub troubleshooting: Vec<String>,
    /// When the archive was finished
    pub built_at: DateTime<Utc>,
}

/// The packaging pipeline for one plugin project.
///
/// Holds the resolved layout and the collaborators every stage needs. The
/// bundler and declaration scanner default to the configured command and the
/// prefix regex; tests replace them through [`with_bundler`](Self::with_bundler)
/// and [`with_scanner`](Self::with_scanner).
pub struct Pipeline {
    layout: PluginLayout,
    config: PackagerConfig,
    bundler: Box<dyn Bundler>,
    scanner: Box<dyn DeclarationScanner>,
    reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("layout", &self.layout)
            .field("checks", &self.config.checks)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Creates a pipeline for `project_root`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn from_config(
        project_root: impl AsRef<Path>,
        config: PackagerConfig,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self> {
        let layout = PluginLayout::new(project_root, &config)?;
        let bundler = CommandBundler::from_config(&config.bundler, layout.project_root());
        let scanner = PrefixPatternScanner::new(&config.handler_prefix())?;

        Ok(Self {
            layout,
            config,
            bundler: Box::new(bundler),
            scanner: Box::new(scanner),
            reporter,
        })
    }

    /// Replaces the bundler.
    #[must_use]
    pub fn with_bundler(mut self, bundler: impl Bundler + 'static) -> Self {
        self.bundler = Box::new(bundler);
        self
    }

    /// Replaces the declaration scanner.
    #[must_use]
    pub fn with_scanner(mut self, scanner: impl DeclarationScanner + 'static) -> Self {
        self.scanner = Box::new(scanner);
        self
    }

    /// Resolved layout.
    #[must_use]
    pub const fn layout(&self) -> &PluginLayout {
        &self.layout
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &PackagerConfig {
        &self.config
    }

    /// Probes, provisions, seeds, cleans, bundles, and verifies.
    ///
    /// # Errors
    ///
    /// Returns a filesystem error from provisioning, seeding, or cleaning,
    /// [`wpp_core::Error::BundlerFailed`] if both bundler attempts fail, or
    /// [`wpp_core::Error::BuildOutputIncomplete`] under strict verification.
    pub async fn build(&self) -> Result<BuildReport> {
        let reporter = self.reporter.as_ref();
        reporter.info(
            Stage::Provision,
            &format!(
                "Building {} React component for WordPress",
                self.layout.display_name()
            ),
        );
        tracing::info!(
            plugin_dir = %self.layout.plugin_root().display(),
            build_dir = %self.layout.build_dir().display(),
            assets_dir = %self.layout.assets_dir().display(),
            "Resolved plugin layout"
        );

        let probe = probe::run(&self.layout, &self.config.bundler.minifier, reporter);
        let provision = provision::provision(&self.layout, reporter)?;
        let seeded = seed::seed(&self.layout, reporter)?;
        let invocation =
            bundler::invoke(self.bundler.as_ref(), self.layout.build_dir(), reporter).await?;

        let mode = self.config.checks.build_output;
        if !mode.is_strict() {
            reporter.warn(
                Stage::Verify,
                "Build output checks are advisory; missing assets will not fail the run",
            );
        }
        let output = verify::verify(&self.layout, mode, reporter)?;

        Ok(BuildReport {
            probe,
            provision,
            seeded,
            invocation,
            output,
        })
    }

    /// Checks the entry file for duplicate handler declarations.
    ///
    /// # Errors
    ///
    /// Returns a validation error under strict structure checking, or a
    /// filesystem error if the entry file cannot be read.
    pub fn validate(&self) -> Result<ValidationReport> {
        validate::validate(
            &self.layout,
            self.scanner.as_ref(),
            self.config.checks.structure,
            self.reporter.as_ref(),
        )
    }

    /// Runs the build, validates, and writes the distribution archive.
    ///
    /// The previous archive is replaced only when every stage succeeds.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage.
    pub async fn package(&self) -> Result<PackageReport> {
        let reporter = self.reporter.as_ref();
        let build = self.build().await?;
        let validation = self.validate()?;

        let archive_path = self.layout.archive_path();
        if archive_path.exists() {
            reporter.emit(
                Event::new(Level::Info, Stage::Archive, "Existing archive will be replaced")
                    .with_path(archive_path),
            );
        }

        provision::provision(&self.layout, reporter)?;
        seed::seed(&self.layout, reporter)?;

        reporter.info(Stage::Archive, "Creating plugin zip file");
        let archive = write_archive(
            self.layout.plugin_root(),
            self.layout.plugin_id().as_str(),
            archive_path,
            self.config.archive.compression_level,
        )?;
        reporter.emit(
            Event::new(
                Level::Success,
                Stage::Archive,
                format!("Plugin zip created successfully ({} bytes)", archive.bytes),
            )
            .with_path(&archive.path),
        );

        Ok(PackageReport {
            plugin_id: self.layout.plugin_id().to_string(),
            install_steps: self.install_steps(),
            troubleshooting: troubleshooting(),
            built_at: Utc::now(),
            archive,
            build,
            validation,
        })
    }

    fn install_steps(&self) -> Vec<String> {
        let archive_name = self
            .layout
            .archive_path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let shortcodes = self
            .config
            .shortcodes()
            .iter()
            .map(|s| format!("[{s}]"))
            .collect::<Vec<_>>()
            .join(" or ");

        vec![
            "Go to WordPress Admin > Plugins > Add New > Upload Plugin".to_string(),
            format!("Upload the {archive_name} file"),
            "Activate the plugin".to_string(),
            format!("Add the shortcode {shortcodes} to your page"),
        ]
    }
}

fn troubleshooting() -> Vec<String> {
    vec![
        "If you encounter any errors, check the WordPress and server error logs".to_string(),
        "Deactivate and delete any previous versions before installing a new one".to_string(),
        "If activation reports a redeclared function, run `wp-packager validate`".to_string(),
    ]
}
