//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use moondash_core::{Badge, BadgeCategory};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Badge label, colored by category when enabled.
pub fn paint_badge(badge: &Badge, color: bool) -> String {
    let label = badge.label.as_str();
    if !color {
        return label.to_owned();
    }
    match badge.category {
        BadgeCategory::Info => label.blue().to_string(),
        BadgeCategory::Pending => label.yellow().to_string(),
        BadgeCategory::Transit => label.cyan().to_string(),
        BadgeCategory::Success => label.green().to_string(),
        BadgeCategory::Danger => label.red().to_string(),
        BadgeCategory::Neutral => label.dimmed().to_string(),
        BadgeCategory::Unstyled => label.to_owned(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
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

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    if rows.is_empty() {
        return "(none)".into();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, Tabled)]
    struct Row {
        id: String,
        name: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: "a".into(),
                name: "Crater Cafe".into(),
            },
            Row {
                id: "b".into(),
                name: "Mare Grill".into(),
            },
        ]
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let out = render_list(
            &OutputFormat::Plain,
            &rows(),
            |r| Row {
                id: r.id.clone(),
                name: r.name.clone(),
            },
            |r| r.id.clone(),
        );
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_list(
            &OutputFormat::JsonCompact,
            &rows(),
            |r| Row {
                id: r.id.clone(),
                name: r.name.clone(),
            },
            |r| r.id.clone(),
        );
        assert!(!out.contains('\n'));
        assert!(out.contains("Crater Cafe"));
    }

    #[test]
    fn badges_stay_plain_without_color() {
        let badge = Badge {
            label: "DELIVERED".into(),
            category: BadgeCategory::Success,
        };
        assert_eq!(paint_badge(&badge, false), "DELIVERED");
        assert!(paint_badge(&badge, true).contains("DELIVERED"));
    }

    #[test]
    fn empty_tables_say_so() {
        let empty: Vec<Row> = Vec::new();
        assert_eq!(render_table(&empty), "(none)");
    }
}
