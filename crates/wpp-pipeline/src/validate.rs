//! Plugin structure validation.
//!
//! PHP aborts plugin activation with "Cannot redeclare function" when a
//! handler is declared twice, so the entry file is scanned before packaging.

use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use wpp_core::{CheckMode, Error, Event, Level, PluginLayout, Reporter, Result, Stage};

/// Extracts handler declarations from entry file source.
pub trait DeclarationScanner: Send + Sync {
    /// Returns every declared handler name in source order, repeats included.
    fn declarations(&self, source: &str) -> Vec<String>;
}

/// Regex scanner for `function <prefix>...` declarations.
///
/// # Examples
///
/// ```
/// use wpp_pipeline::{DeclarationScanner, PrefixPatternScanner};
///
/// let scanner = PrefixPatternScanner::new("names_fusion_").unwrap();
/// let source = "<?php\nfunction names_fusion_shortcode() {}\nfunction other() {}\n";
/// assert_eq!(scanner.declarations(source), vec!["names_fusion_shortcode"]);
/// ```
#[derive(Debug, Clone)]
pub struct PrefixPatternScanner {
    pattern: Regex,
}

impl PrefixPatternScanner {
    /// Creates a scanner for handler names starting with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the pattern cannot be compiled.
    pub fn new(prefix: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"\bfunction\s+({}\w*)", regex::escape(prefix)))
            .map_err(|e| Error::ConfigError {
                message: format!("invalid handler prefix '{prefix}': {e}"),
            })?;
        Ok(Self { pattern })
    }
}

impl DeclarationScanner for PrefixPatternScanner {
    fn declarations(&self, source: &str) -> Vec<String> {
        self.pattern
            .captures_iter(source)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Multiset of declared handler names.
///
/// # Examples
///
/// ```
/// use wpp_pipeline::HandlerInventory;
///
/// let inventory = HandlerInventory::new(["foo", "bar", "foo"].map(String::from).to_vec());
/// assert!(inventory.has_duplicates());
/// assert_eq!(inventory.distinct(), vec!["foo", "bar"]);
/// assert_eq!(inventory.duplicates(), vec!["foo"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerInventory {
    declarations: Vec<String>,
}

impl HandlerInventory {
    /// Wraps scanned declarations.
    #[must_use]
    pub const fn new(declarations: Vec<String>) -> Self {
        Self { declarations }
    }

    /// Number of declarations, repeats included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns `true` if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Distinct names in order of first declaration.
    #[must_use]
    pub fn distinct(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.declarations
            .iter()
            .filter(|name| seen.insert(*name))
            .cloned()
            .collect()
    }

    /// Names declared more than once, in order of first declaration.
    #[must_use]
    pub fn duplicates(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in &self.declarations {
            *counts.entry(name.as_str()).or_default() += 1;
        }

        self.distinct()
            .into_iter()
            .filter(|name| counts.get(name.as_str()).copied().unwrap_or_default() > 1)
            .collect()
    }

    /// Returns `true` if the multiset is larger than its distinct set.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.declarations.len() != self.distinct().len()
    }
}

/// Result of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Entry file that was scanned
    pub entry_file: PathBuf,
    /// Whether the entry file exists
    pub entry_found: bool,
    /// Distinct handler names in order of first declaration
    pub handlers: Vec<String>,
    /// Names declared more than once
    pub duplicates: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if the entry file exists and declares each handler once.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.entry_found && self.duplicates.is_empty()
    }
}

/// Scans the entry file of `layout` for duplicate handler declarations.
///
/// A missing entry file and duplicate declarations are findings: under
/// [`CheckMode::Strict`] they abort, under [`CheckMode::Advisory`] they are
/// reported as error events and returned in the report.
///
/// # Errors
///
/// Returns [`Error::MissingEntryFile`] or [`Error::DuplicateHandlers`] in
/// strict mode, or [`Error::Filesystem`] if the file exists but cannot be read.
pub fn validate(
    layout: &PluginLayout,
    scanner: &dyn DeclarationScanner,
    mode: CheckMode,
    reporter: &dyn Reporter,
) -> Result<ValidationReport> {
    let entry_file = layout.entry_file();
    reporter.info(Stage::Validate, "Validating plugin structure");

    let Some(source) = read_entry(&entry_file)? else {
        reporter.emit(
            Event::new(Level::Error, Stage::Validate, "Plugin PHP file not found")
                .with_path(&entry_file),
        );
        if mode.is_strict() {
            return Err(Error::MissingEntryFile { path: entry_file });
        }
        return Ok(ValidationReport {
            entry_file,
            entry_found: false,
            handlers: Vec::new(),
            duplicates: Vec::new(),
        });
    };

    let inventory = HandlerInventory::new(scanner.declarations(&source));
    let handlers = inventory.distinct();
    tracing::debug!(
        "Found {} handler declarations ({} distinct) in {}",
        inventory.len(),
        handlers.len(),
        entry_file.display()
    );

    if inventory.has_duplicates() {
        let duplicates = inventory.duplicates();
        reporter.emit(
            Event::new(
                Level::Error,
                Stage::Validate,
                format!(
                    "Duplicate handler functions detected: {}",
                    duplicates.join(", ")
                ),
            )
            .with_path(&entry_file),
        );
        reporter.info(
            Stage::Validate,
            &format!("Functions found: {}", handlers.join(", ")),
        );

        if mode.is_strict() {
            return Err(Error::DuplicateHandlers {
                distinct: handlers,
                duplicates,
            });
        }
        return Ok(ValidationReport {
            entry_file,
            entry_found: true,
            handlers,
            duplicates,
        });
    }

    if inventory.is_empty() {
        reporter.warn(Stage::Validate, "No handler declarations found in entry file");
    } else {
        reporter.success(
            Stage::Validate,
            &format!("Handlers declared once each: {}", handlers.join(", ")),
        );
    }

    Ok(ValidationReport {
        entry_file,
        entry_found: true,
        handlers,
        duplicates: Vec::new(),
    })
}

/// Reads the entry file as lossy UTF-8, or `None` if it does not exist.
fn read_entry(path: &Path) -> Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::filesystem("read entry file", path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wpp_core::{MemoryReporter, PackagerConfig};

    fn scanner() -> PrefixPatternScanner {
        PrefixPatternScanner::new("names_fusion_").unwrap()
    }

    fn layout_with_entry(temp: &TempDir, source: &str) -> PluginLayout {
        let layout = PluginLayout::new(temp.path(), &PackagerConfig::default()).unwrap();
        fs::create_dir_all(layout.plugin_root()).unwrap();
        fs::write(layout.entry_file(), source).unwrap();
        layout
    }

    #[test]
    fn test_scanner_ignores_lookalikes() {
        let source = r"<?php
            if (!function_exists('names_fusion_shortcode')) {
                function   names_fusion_shortcode($atts) {}
            }
            function names_fusion_enqueue() {}
            function other_plugin_init() {}
            add_shortcode('names_fusion', 'names_fusion_shortcode');
        ";

        assert_eq!(
            scanner().declarations(source),
            vec!["names_fusion_shortcode", "names_fusion_enqueue"]
        );
    }

    #[test]
    fn test_prefix_is_matched_literally() {
        let scanner = PrefixPatternScanner::new("a.b_").unwrap();
        assert!(scanner.declarations("function axb_run() {}").is_empty());
        assert_eq!(scanner.declarations("function a.b_run() {}"), vec!["a.b_run"]);
    }

    #[test]
    fn test_inventory_without_duplicates() {
        let inventory = HandlerInventory::new(vec!["foo".to_string(), "bar".to_string()]);
        assert!(!inventory.has_duplicates());
        assert!(inventory.duplicates().is_empty());
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn test_duplicate_declarations_fail_strict() {
        let temp = TempDir::new().unwrap();
        let layout = layout_with_entry(
            &temp,
            "<?php\nfunction names_fusion_foo() {}\nfunction names_fusion_bar() {}\nfunction names_fusion_foo() {}\n",
        );

        let err = validate(&layout, &scanner(), CheckMode::Strict, &MemoryReporter::new())
            .unwrap_err();

        match err {
            Error::DuplicateHandlers {
                distinct,
                duplicates,
            } => {
                assert_eq!(distinct, vec!["names_fusion_foo", "names_fusion_bar"]);
                assert_eq!(duplicates, vec!["names_fusion_foo"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_declarations_advisory() {
        let temp = TempDir::new().unwrap();
        let layout = layout_with_entry(
            &temp,
            "function names_fusion_a(){}\nfunction names_fusion_a(){}",
        );
        let reporter = MemoryReporter::new();

        let report = validate(&layout, &scanner(), CheckMode::Advisory, &reporter).unwrap();

        assert!(!report.is_valid());
        assert_eq!(report.duplicates, vec!["names_fusion_a"]);
        assert_eq!(reporter.messages(Level::Error).len(), 1);
    }

    #[test]
    fn test_unique_declarations_pass() {
        let temp = TempDir::new().unwrap();
        let layout = layout_with_entry(
            &temp,
            "function names_fusion_foo() {}\nfunction names_fusion_bar() {}",
        );
        let reporter = MemoryReporter::new();

        let report = validate(&layout, &scanner(), CheckMode::Strict, &reporter).unwrap();

        assert!(report.is_valid());
        assert_eq!(report.handlers, vec!["names_fusion_foo", "names_fusion_bar"]);
        assert_eq!(reporter.messages(Level::Success).len(), 1);
    }

    #[test]
    fn test_missing_entry_file() {
        let temp = TempDir::new().unwrap();
        let layout = PluginLayout::new(temp.path(), &PackagerConfig::default()).unwrap();

        let err = validate(&layout, &scanner(), CheckMode::Strict, &MemoryReporter::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingEntryFile { .. }));

        let report =
            validate(&layout, &scanner(), CheckMode::Advisory, &MemoryReporter::new()).unwrap();
        assert!(!report.entry_found);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_invalid_utf8_is_read_lossily() {
        let temp = TempDir::new().unwrap();
        let layout = PluginLayout::new(temp.path(), &PackagerConfig::default()).unwrap();
        fs::create_dir_all(layout.plugin_root()).unwrap();
        let mut bytes = b"<?php // \xff\xfe\nfunction names_fusion_x() {}".to_vec();
        bytes.push(b'\n');
        fs::write(layout.entry_file(), bytes).unwrap();

        let report =
            validate(&layout, &scanner(), CheckMode::Strict, &MemoryReporter::new()).unwrap();
        assert_eq!(report.handlers, vec!["names_fusion_x"]);
    }
}
