//! Output formatters for command summaries.
//!
//! Every command builds a serializable summary and hands it to
//! [`format_output`], so `--format` behaves the same everywhere.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use wpp_core::cli::OutputFormat;

/// Formats `data` for `format`.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Examples
///
/// ```
/// use serde::Serialize;
/// use wpp_cli::formatters::format_output;
/// use wpp_core::cli::OutputFormat;
///
/// #[derive(Serialize)]
/// struct Summary {
///     plugin_id: String,
///     entries: usize,
/// }
///
/// let summary = Summary { plugin_id: "names-fusion".to_string(), entries: 12 };
/// let text = format_output(&summary, OutputFormat::Text)?;
/// assert_eq!(text, r#"{"plugin_id":"names-fusion","entries":12}"#);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Text => Ok(serde_json::to_string(data)?),
        OutputFormat::Pretty => Ok(pretty::format(&serde_json::to_value(data)?)),
    }
}

/// Indented `key: value` rendering with colored keys.
pub mod pretty {
    use super::Colorize;
    use serde_json::Value;

    /// Renders `value` as an indented tree.
    #[must_use]
    pub fn format(value: &Value) -> String {
        let mut out = String::new();
        write_value(&mut out, value, 0);
        out.trim_end().to_string()
    }

    fn write_value(out: &mut String, value: &Value, indent: usize) {
        let pad = "  ".repeat(indent);
        match value {
            Value::Object(map) => {
                for (key, val) in map {
                    if is_scalar(val) {
                        out.push_str(&format!("{pad}{}: {}\n", key.bold(), scalar(val)));
                    } else if is_empty(val) {
                        out.push_str(&format!("{pad}{}: {}\n", key.bold(), "(none)".dimmed()));
                    } else {
                        out.push_str(&format!("{pad}{}:\n", key.bold()));
                        write_value(out, val, indent + 1);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    if is_scalar(item) {
                        out.push_str(&format!("{pad}- {}\n", scalar(item)));
                    } else {
                        out.push_str(&format!("{pad}-\n"));
                        write_value(out, item, indent + 1);
                    }
                }
            }
            other => out.push_str(&format!("{pad}{}\n", scalar(other))),
        }
    }

    const fn is_scalar(value: &Value) -> bool {
        !matches!(value, Value::Object(_) | Value::Array(_))
    }

    fn is_empty(value: &Value) -> bool {
        match value {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    fn scalar(value: &Value) -> String {
        match value {
            Value::Null => "null".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.green().to_string(),
            Value::Array(_) | Value::Object(_) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_is_pretty_printed() {
        let out = format_output(&json!({"a": 1}), OutputFormat::Json).unwrap();
        assert_eq!(out, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_pretty_renders_nested_tree() {
        colored::control::set_override(false);
        let value = json!({
            "plugin_id": "names-fusion",
            "scripts": ["index.a.js"],
            "problems": [],
            "archive": {"bytes": 42, "replaced": false}
        });

        let out = pretty::format(&value);

        assert!(out.contains("plugin_id: names-fusion"));
        assert!(out.contains("scripts:\n  - index.a.js"));
        assert!(out.contains("problems: (none)"));
        assert!(out.contains("archive:\n  bytes: 42\n  replaced: false"));
    }
}
