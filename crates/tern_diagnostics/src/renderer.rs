//! Diagnostic rendering against a position space.

use crate::diagnostic::Diagnostic;
use crate::label::{Label, LabelStyle};
use crate::severity::Severity;
use tern_source::{PositionSpace, Span};

/// Formats diagnostics for output.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic, resolving its spans through `space`.
    fn render(&self, diag: &Diagnostic, space: &PositionSpace) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// ```text
/// error[E102]: expected selector after '.'
///   --> src/main.tn:3:3
///    |
///  3 |   x.
///    |   ^^ selector missing
/// ```
pub struct TerminalRenderer {
    /// Whether to wrap the header in ANSI color codes.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let text = format!("{}[{}]: {}", diag.severity, diag.code, diag.message);
        if !self.color {
            return text;
        }
        let code = match diag.severity {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
            Severity::Note => "1;36",
        };
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, space: &PositionSpace) -> String {
        let mut out = String::new();
        out.push_str(&self.header(diag));
        out.push('\n');

        if let Some(resolved) = space.resolve_span(diag.primary_span) {
            out.push_str(&format!("  --> {resolved}\n"));
            let primary_msg = diag
                .labels
                .iter()
                .find(|l| l.style == LabelStyle::Primary)
                .map(|l| l.message.as_str())
                .unwrap_or_default();
            render_snippet(&mut out, space, diag.primary_span, '^', primary_msg);
        }

        for label in diag.labels.iter().filter(|l| l.style == LabelStyle::Secondary) {
            render_secondary(&mut out, space, label);
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        out
    }
}

fn render_secondary(out: &mut String, space: &PositionSpace, label: &Label) {
    if let Some(resolved) = space.resolve_span(label.span) {
        out.push_str(&format!("  ::: {resolved}\n"));
        render_snippet(out, space, label.span, '-', &label.message);
    }
}

/// Writes the source line containing `span.start` with an underline.
fn render_snippet(out: &mut String, space: &PositionSpace, span: Span, mark: char, msg: &str) {
    let Some(file) = space.file_at(span.start) else {
        return;
    };
    let Some(resolved) = file.resolve(span.start) else {
        return;
    };
    let line_content = file.map().line_text(resolved.line).unwrap_or_default();
    let line_num = resolved.line.to_string();
    let padding = " ".repeat(line_num.len());

    // Synthetic spans past the end of the file still get a one-column marker.
    let line_remaining = (line_content.len() + 1).saturating_sub(resolved.col as usize);
    let width = (span.len() as usize).clamp(1, line_remaining.max(1));
    let marks = mark.to_string().repeat(width);
    let col_padding = " ".repeat((resolved.col as usize).saturating_sub(1));
    let msg = if msg.is_empty() {
        String::new()
    } else {
        format!(" {msg}")
    };

    out.push_str(&format!("{padding} |\n"));
    out.push_str(&format!("{line_num} | {line_content}\n"));
    out.push_str(&format!("{padding} | {col_padding}{marks}{msg}\n"));
}
