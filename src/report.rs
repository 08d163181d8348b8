//! Rendering of engine diagnostics against the source they refer to.
//!
//! Three renderings are available:
//!
//! - [`render_graphical`]: `miette` graphical report (what `peephole check` prints on a terminal).
//! - [`render_plain`]: compact `error: ... --> file:line:col` blocks without colors, stable enough for snapshots.
//! - [`render_json`]: machine-readable array for `--json`.

use std::fmt;

use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource};
use peephole_core::{Diagnostic, Severity, Subject};
use serde_json::json;

use crate::source_map::line_info;

/// A diagnostic bundled with the file it was found in, for `miette` rendering.
#[derive(Debug)]
pub struct SourceDiagnostic<'a> {
    diagnostic: &'a Diagnostic,
    source: &'a NamedSource<String>,
}

impl<'a> SourceDiagnostic<'a> {
    pub fn new(diagnostic: &'a Diagnostic, source: &'a NamedSource<String>) -> Self {
        Self { diagnostic, source }
    }
}

impl fmt::Display for SourceDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diagnostic.message)
    }
}

impl std::error::Error for SourceDiagnostic<'_> {}

impl miette::Diagnostic for SourceDiagnostic<'_> {
    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diagnostic.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.diagnostic.hints.is_empty() {
            return None;
        }
        Some(Box::new(self.diagnostic.hints.join("\n")))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.diagnostic.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new(
            Some(subject_label(&self.diagnostic.subject)),
            span.start,
            span.len(),
        ))))
    }
}

fn subject_label(subject: &Subject) -> String {
    match subject {
        Subject::Type(name) => format!("on `{name}`"),
        Subject::Member { owner, name } => format!("on `{owner}::{name}`"),
    }
}

/// Render every diagnostic as a `miette` graphical report.
pub fn render_graphical(file_name: &str, source: &str, diagnostics: &[Diagnostic], color: bool) -> String {
    let named = NamedSource::new(file_name, source.to_string());
    let theme = if color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let handler = GraphicalReportHandler::new_themed(theme);

    let mut out = String::new();
    for diagnostic in diagnostics {
        let report = SourceDiagnostic::new(diagnostic, &named);
        if handler.render_report(&mut out, &report).is_err() {
            tracing::warn!("graphical rendering failed, falling back to plain output");
            out.push_str(&render_one_plain(file_name, source, diagnostic));
        }
    }
    out
}

/// Render every diagnostic in the compact plain format.
pub fn render_plain(file_name: &str, source: &str, diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| render_one_plain(file_name, source, d))
        .collect()
}

fn render_one_plain(file_name: &str, source: &str, diagnostic: &Diagnostic) -> String {
    let mut out = format!("{}: {}\n", diagnostic.severity, diagnostic.message);

    match diagnostic.span {
        Some(span) => {
            let (line_num, col_num, line_text) = line_info(source, span.start);
            let width = line_num.to_string().len();
            out.push_str(&format!("  --> {file_name}:{line_num}:{col_num}\n"));
            out.push_str(&format!("  {:>width$} |\n", ""));
            out.push_str(&format!("  {line_num:>width$} | {line_text}\n"));

            let remaining = line_text.chars().count().saturating_sub(col_num - 1);
            let underline = source
                .get(span.start..span.end)
                .map(|text| text.chars().take_while(|c| *c != '\n').count())
                .unwrap_or(0)
                .min(remaining)
                .max(1);
            out.push_str(&format!(
                "  {:>width$} | {}{}\n",
                "",
                " ".repeat(col_num - 1),
                "^".repeat(underline)
            ));
        }
        None => out.push_str(&format!("  --> {file_name}\n")),
    }

    out.push_str(&format!("  = note: {}\n", subject_label(&diagnostic.subject)));
    for hint in &diagnostic.hints {
        out.push_str(&format!("  = hint: {hint}\n"));
    }
    out.push('\n');
    out
}

/// Diagnostics as a JSON array, one object per diagnostic.
pub fn render_json(file_name: &str, source: &str, diagnostics: &[Diagnostic]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = diagnostics
        .iter()
        .map(|d| {
            let location = d.span.map(|span| {
                let (line, column, _) = line_info(source, span.start);
                json!({ "line": line, "column": column, "start": span.start, "end": span.end })
            });
            let subject = match &d.subject {
                Subject::Type(name) => json!({ "type": name }),
                Subject::Member { owner, name } => json!({ "type": owner, "member": name }),
            };
            json!({
                "file": file_name,
                "severity": d.severity.to_string(),
                "message": d.message,
                "subject": subject,
                "location": location,
                "hints": d.hints,
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use peephole_core::Span;

    const SOURCE: &str = "struct Hotel {\n    name: String,\n}\n";

    fn warning() -> Diagnostic {
        Diagnostic::warning(
            "Not generating __NAME: already exists",
            Subject::Member {
                owner: "Hotel".into(),
                name: "name".into(),
            },
        )
        .with_span(Some(Span::new(19, 23)))
    }

    #[test]
    fn test_plain_points_at_span() {
        let text = render_plain("hotel.rs", SOURCE, &[warning()]);
        let expected = "\
warning: Not generating __NAME: already exists
  --> hotel.rs:2:5
    |
  2 |     name: String,
    |     ^^^^
  = note: on `Hotel::name`

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_plain_without_span() {
        let diagnostic = Diagnostic::error("boom", Subject::Type("Hotel".into())).with_hint("try again");
        let text = render_plain("hotel.rs", SOURCE, &[diagnostic]);
        assert_eq!(text, "error: boom\n  --> hotel.rs\n  = note: on `Hotel`\n  = hint: try again\n\n");
    }

    #[test]
    fn test_json_shape() {
        let value = render_json("hotel.rs", SOURCE, &[warning()]);
        let entry = &value[0];
        assert_eq!(entry["severity"], "warning");
        assert_eq!(entry["subject"]["member"], "name");
        assert_eq!(entry["location"]["line"], 2);
        assert_eq!(entry["location"]["column"], 5);
        assert!(entry["hints"].as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn test_graphical_mentions_file_and_message() {
        let text = render_graphical("hotel.rs", SOURCE, &[warning()], false);
        assert!(text.contains("hotel.rs"));
        assert!(text.contains("Not generating __NAME: already exists"));
    }
}
