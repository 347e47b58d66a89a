//! Terminal rendering of pipeline events.

use colored::Colorize;
use std::sync::Arc;
use wpp_core::cli::OutputFormat;
use wpp_core::{Event, Level, Reporter, TracingReporter};

/// Prints events as colored status lines on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Renders one event as a single line.
    #[must_use]
    pub fn render(event: &Event) -> String {
        let symbol = match event.level {
            Level::Info => " ".normal(),
            Level::Success => "✓".green(),
            Level::Warn => "⚠".yellow(),
            Level::Error => "✗".red(),
        };
        let message = match event.level {
            Level::Error => event.message.red().to_string(),
            Level::Warn => event.message.yellow().to_string(),
            Level::Info | Level::Success => event.message.clone(),
        };

        match &event.path {
            Some(path) => format!(
                "{symbol} {message}: {}",
                path.display().to_string().dimmed()
            ),
            None => format!("{symbol} {message}"),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn emit(&self, event: Event) {
        tracing::debug!(stage = event.stage.as_str(), "{}", event.message);
        println!("{}", Self::render(&event));
    }
}

/// Chooses the reporter for `format`.
///
/// Machine-readable formats keep stdout for the final summary and send
/// progress to the tracing subscriber on stderr.
#[must_use]
pub fn for_format(format: OutputFormat) -> Arc<dyn Reporter> {
    if format.is_machine_readable() {
        Arc::new(TracingReporter)
    } else {
        Arc::new(ConsoleReporter)
    }
}
