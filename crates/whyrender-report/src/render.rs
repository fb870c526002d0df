//! Human-readable and JSON rendering of comparison results.

use std::fmt::Write as _;
use std::io::Write;

use colored::Colorize;
use whyrender_diff::{diff_sources, ComparisonResult, DiffEntry, SourceLine};

use crate::config::{ReportConfig, ReportFormat};
use crate::error::ReportResult;

/// Write `result` to `writer` in the configured format.
pub fn report_diagnostics<W: Write>(
    result: &ComparisonResult,
    config: &ReportConfig,
    writer: &mut W,
) -> ReportResult<()> {
    match config.format {
        ReportFormat::Text => writer.write_all(render_text(result, config).as_bytes())?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, result)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

struct Painter {
    enabled: bool,
}

impl Painter {
    fn paint(&self, text: &str, style: fn(&str) -> colored::ColoredString) -> String {
        if self.enabled {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Render `result` as text, one line per fact.
pub fn render_text(result: &ComparisonResult, config: &ReportConfig) -> String {
    let painter = Painter {
        enabled: config.color,
    };
    let tag = if result.tag.is_empty() {
        config.tag.as_str()
    } else {
        result.tag.as_str()
    };
    let name = if result.display_name.is_empty() {
        config.display_name.as_str()
    } else {
        result.display_name.as_str()
    };
    let prefix = format!("{} {}", painter.paint(tag, |s| s.dimmed()), name);

    let mut out = String::new();
    let _ = writeln!(out, "{prefix} ---- BEGIN RENDER ----");
    let _ = writeln!(out, "{prefix} Are props equal? {}", result.props_equal);

    if result.is_empty() {
        let _ = writeln!(out, "{prefix} No props changed.");
    } else {
        let _ = writeln!(
            out,
            "{} *** Why did {} render? *** {} changed",
            painter.paint(tag, |s| s.dimmed()),
            painter.paint(name, |s| s.bold()),
            result.len()
        );
    }

    for (key, change) in &result.changes {
        let _ = writeln!(
            out,
            "{prefix} prop: {} ({})",
            painter.paint(key, |s| s.yellow()),
            change.reason
        );
        if config.show_values {
            let _ = writeln!(out, "    previous: {}", change.previous_value);
            let _ = writeln!(out, "    next:     {}", change.next_value);
        }
        for entry in &change.diff {
            write_entry(&mut out, entry, &painter, config.source_context);
        }
    }

    let _ = writeln!(out, "{prefix} ---- END RENDER ----");
    out
}

fn write_entry(out: &mut String, entry: &DiffEntry, painter: &Painter, context: usize) {
    match entry {
        DiffEntry::Field {
            key,
            previous,
            next,
        } => {
            let _ = writeln!(
                out,
                "    field {key}: {} -> {}",
                painter.paint(previous, |s| s.red()),
                painter.paint(next, |s| s.green())
            );
        }
        DiffEntry::Warning {
            key,
            message,
            previous,
            next,
        } => {
            let label = match key {
                Some(key) => format!("warnings {key}"),
                None => "warnings".to_string(),
            };
            let _ = writeln!(out, "    {}: {message}", painter.paint(&label, |s| s.yellow()));
            let _ = writeln!(out, "      previous: {}", previous.display());
            let _ = writeln!(out, "      next:     {}", next.display());
        }
        DiffEntry::Function { previous, next } => {
            let _ = writeln!(out, "    {}:", painter.paint("functions", |s| s.cyan()));
            write_source_diff(out, previous, next, painter, context);
        }
        DiffEntry::Primitive { previous, next } => {
            let _ = writeln!(
                out,
                "    primitives: {} -> {}",
                painter.paint(previous, |s| s.red()),
                painter.paint(next, |s| s.green())
            );
        }
        DiffEntry::TypeMismatch {
            message,
            previous,
            next,
        } => {
            let _ = writeln!(out, "    {}: {message}", painter.paint("errors", |s| s.red()));
            let _ = writeln!(out, "      previous: {previous}");
            let _ = writeln!(out, "      next:     {next}");
        }
    }
}

fn write_source_diff(
    out: &mut String,
    previous: &str,
    next: &str,
    painter: &Painter,
    context: usize,
) {
    let diff = diff_sources(previous, next, context);
    if diff.is_empty() {
        // Same text, different function instances.
        let _ = writeln!(out, "      (identical source) {previous}");
        return;
    }
    for hunk in &diff.hunks {
        let _ = writeln!(
            out,
            "      @@ previous line {}, next line {} @@",
            hunk.previous_start, hunk.next_start
        );
        for line in &hunk.lines {
            let _ = match line {
                SourceLine::Context(text) => writeln!(out, "        {text}"),
                SourceLine::Removed(text) => {
                    writeln!(out, "      {}", painter.paint(&format!("- {text}"), |s| s.red()))
                }
                SourceLine::Added(text) => {
                    writeln!(out, "      {}", painter.paint(&format!("+ {text}"), |s| s.green()))
                }
            };
        }
    }
}
