//! Output formatting: JSON envelope or table.
//!
//! JSON formats print the `{"ok": ...}` envelope the gateway defines.
//! Tables use `tabled`; single outcomes render as a key/value table.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use huelink_core::{CoreError, ok_body};

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list under `key` (`{"ok": true, key: [...]}`) or as a table.
pub fn render_list<T, R>(
    format: OutputFormat,
    key: &str,
    data: &[T],
    to_row: impl Fn(&T) -> R,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json | OutputFormat::JsonCompact => {
            render_json(&ok_body(key, serde_json::to_value(data)?), format)
        }
    }
}

/// Render a single outcome merged into the envelope, or as key/value rows.
pub fn render_single<T: Serialize>(format: OutputFormat, data: &T) -> Result<String, CliError> {
    let value = serde_json::to_value(data)?;
    match format {
        OutputFormat::Table => Ok(render_fields(&value)),
        OutputFormat::Json | OutputFormat::JsonCompact => {
            render_json(&ok_body("", value), format)
        }
    }
}

/// Print the failure envelope for JSON formats so scripts see `ok: false`
/// on stdout; the diagnostic itself goes to stderr.
pub fn print_failure(format: OutputFormat, err: &CoreError) {
    if format == OutputFormat::Table {
        return;
    }
    if let Ok(out) = render_json(&err.to_body(), format) {
        print_output(&out, false);
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_fields(value: &Value) -> String {
    let mut builder = Builder::default();
    match value {
        Value::Object(map) => {
            for (key, field) in map {
                builder.push_record([key.clone(), plain(field)]);
            }
        }
        other => builder.push_record([plain(other)]),
    }
    builder.build().with(Style::rounded()).to_string()
}

fn render_json(value: &Value, format: OutputFormat) -> Result<String, CliError> {
    let out = if format == OutputFormat::JsonCompact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(out)
}

/// Scalars without JSON quoting; `null` as an empty cell.
pub fn plain(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_merges_into_envelope() {
        let out = render_single(OutputFormat::JsonCompact, &json!({"lightId": "4", "on": false}))
            .unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!({"ok": true, "lightId": "4", "on": false}));
    }

    #[test]
    fn list_goes_under_key() {
        #[derive(Tabled)]
        struct Row {
            id: String,
        }
        let out = render_list(OutputFormat::JsonCompact, "scenes", &[json!({"id": "a"})], |_| Row {
            id: "a".into(),
        })
        .unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!({"ok": true, "scenes": [{"id": "a"}]}));
    }

    #[test]
    fn table_renders_fields() {
        let out = render_single(OutputFormat::Table, &json!({"roomId": "3", "bri": 120})).unwrap();
        assert!(out.contains("roomId"));
        assert!(out.contains("120"));
    }

    #[test]
    fn plain_strips_quotes() {
        assert_eq!(plain(&json!("Loft")), "Loft");
        assert_eq!(plain(&json!(null)), "");
        assert_eq!(plain(&json!(true)), "true");
    }
}
