//! Structured pipeline events.
//!
//! Pipeline stages never print. They emit [`Event`]s to a [`Reporter`] and the
//! caller decides how to render them: the CLI prints colored lines, tests
//! collect them with [`MemoryReporter`], and [`TracingReporter`] forwards them
//! to `tracing`.
//!
//! # Examples
//!
//! ```
//! use wpp_core::{Level, MemoryReporter, Reporter, Stage};
//!
//! let reporter = MemoryReporter::new();
//! reporter.warn(Stage::Probe, "terser is not installed");
//!
//! let events = reporter.events();
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].level, Level::Warn);
//! ```

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Progress information
    Info,
    /// A check or step completed successfully
    Success,
    /// Degraded but acceptable state
    Warn,
    /// A failed check or step
    Error,
}

/// Pipeline stage that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Environment and sibling-folder checks before building
    Probe,
    /// Directory and marker creation
    Provision,
    /// Placeholder asset creation
    Seed,
    /// Build directory cleanup
    Clean,
    /// Bundler invocation
    Bundle,
    /// Build output verification
    Verify,
    /// Duplicate handler validation
    Validate,
    /// Archive creation
    Archive,
}

impl Stage {
    /// Returns the lowercase stage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Probe => "probe",
            Self::Provision => "provision",
            Self::Seed => "seed",
            Self::Clean => "clean",
            Self::Bundle => "bundle",
            Self::Verify => "verify",
            Self::Validate => "validate",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Severity
    pub level: Level,
    /// Producing stage
    pub stage: Stage,
    /// Human-readable message
    pub message: String,
    /// File or directory the event refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Event {
    /// Creates an event without a path.
    #[must_use]
    pub fn new(level: Level, stage: Stage, message: impl Into<String>) -> Self {
        Self {
            level,
            stage,
            message: message.into(),
            path: None,
        }
    }

    /// Attaches a path.
    #[must_use]
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }
}

/// Consumer of pipeline events.
///
/// Implementations must be `Send + Sync`; the pipeline holds them behind an
/// `Arc` across await points.
pub trait Reporter: Send + Sync {
    /// Receives one event.
    fn emit(&self, event: Event);

    /// Emits an [`Level::Info`] event.
    fn info(&self, stage: Stage, message: &str) {
        self.emit(Event::new(Level::Info, stage, message));
    }

    /// Emits a [`Level::Success`] event.
    fn success(&self, stage: Stage, message: &str) {
        self.emit(Event::new(Level::Success, stage, message));
    }

    /// Emits a [`Level::Warn`] event.
    fn warn(&self, stage: Stage, message: &str) {
        self.emit(Event::new(Level::Warn, stage, message));
    }

    /// Emits a [`Level::Error`] event.
    fn error(&self, stage: Stage, message: &str) {
        self.emit(Event::new(Level::Error, stage, message));
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn emit(&self, event: Event) {
        let stage = event.stage.as_str();
        let path = event
            .path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        match event.level {
            Level::Info | Level::Success => {
                tracing::info!(stage, path = %path, "{}", event.message);
            }
            Level::Warn => tracing::warn!(stage, path = %path, "{}", event.message),
            Level::Error => tracing::error!(stage, path = %path, "{}", event.message),
        }
    }
}

/// Records events in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<Event>>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event received so far.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the messages of events at `level`.
    #[must_use]
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }

    /// Returns the events produced by `stage`.
    #[must_use]
    pub fn stage_events(&self, stage: Stage) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.stage == stage)
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn emit(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
