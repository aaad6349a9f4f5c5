//! Rendering for `--output`: tables via `tabled`, JSON and YAML via serde,
//! plain identifiers for scripts. Outcome lines for mutating commands.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color ────────────────────────────────────────────────────────────

pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// One-line command outcome, marked accepted or rejected.
pub fn outcome_line(accepted: bool, message: &str, color: bool) -> String {
    match (accepted, color) {
        (true, true) => format!("{} {message}", "✓".green()),
        (false, true) => format!("{} {message}", "✗".red()),
        (true, false) => format!("ok: {message}"),
        (false, false) => format!("rejected: {message}"),
    }
}

// ── Rendering ────────────────────────────────────────────────────────

/// Serde rendering of `data`; `None` for the human formats.
pub fn render_structured<T: Serialize + ?Sized>(format: OutputFormat, data: &T) -> Option<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(|e| e.to_string()),
        OutputFormat::Table | OutputFormat::Plain => return None,
    };
    Some(rendered.unwrap_or_else(|e| format!("error: serialization failed: {e}")))
}

/// A list as a table of `to_row` rows, or one `id_fn` value per line.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    if let Some(out) = render_structured(format, data) {
        return out;
    }
    if matches!(format, OutputFormat::Plain) {
        return data.iter().map(id_fn).collect::<Vec<_>>().join("\n");
    }
    let rows: Vec<R> = data.iter().map(to_row).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// A single item; the table format uses the pre-formatted `detail_fn` text.
pub fn render_single<T: Serialize>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String {
    render_structured(format, data).unwrap_or_else(|| match format {
        OutputFormat::Plain => id_fn(data),
        _ => detail_fn(data),
    })
}

/// Write to stdout unless quiet or empty.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let _ = writeln!(io::stdout().lock(), "{output}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Item {
        id: u32,
    }

    #[test]
    fn outcome_line_without_color() {
        assert_eq!(outcome_line(true, "done", false), "ok: done");
        assert_eq!(outcome_line(false, "nope", false), "rejected: nope");
    }

    #[test]
    fn plain_list_is_one_value_per_line() {
        let items = [Item { id: 1 }, Item { id: 2 }];
        let out = render_list(
            OutputFormat::Plain,
            &items,
            |i| Item { id: i.id },
            |i| i.id.to_string(),
        );
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn human_formats_are_not_structured() {
        let item = Item { id: 7 };
        assert!(render_structured(OutputFormat::Table, &item).is_none());
        assert!(render_structured(OutputFormat::Plain, &item).is_none());
        assert_eq!(
            render_structured(OutputFormat::JsonCompact, &item).unwrap(),
            r#"{"id":7}"#
        );
    }
}
