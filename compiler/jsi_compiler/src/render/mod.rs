//! Plain-text rendering of diagnostics against their source.

use std::fmt::Write;

use jsi_diagnostic::span_utils::LineOffsetTable;
use jsi_diagnostic::Diagnostic;

/// Render `diagnostics` of the unit `name` with `source` as its text.
///
/// ```text
/// error[E7002]: Anonymous classes may not extend js.Any
///   --> app/Main.scala:3:11
///    = note: ...
/// ```
///
/// Labels repeating the headline are shown as a bare location.
pub fn render_diagnostics(name: &str, source: &str, diagnostics: &[Diagnostic]) -> String {
    let table = LineOffsetTable::build(source);
    let mut out = String::new();
    for diag in diagnostics {
        // Writing to a String cannot fail.
        let _ = render_one(&mut out, &table, name, source, diag);
    }
    out
}

fn render_one(
    out: &mut String,
    table: &LineOffsetTable,
    name: &str,
    source: &str,
    diag: &Diagnostic,
) -> std::fmt::Result {
    writeln!(out, "{}[{}]: {}", diag.severity, diag.code, diag.message)?;
    for label in &diag.labels {
        let (line, col) = table.span_start(source, label.span);
        let marker = if label.is_primary { "-->" } else { ":::" };
        write!(out, "  {marker} {name}:{line}:{col}")?;
        if label.message.is_empty() || label.message == diag.message {
            writeln!(out)?;
        } else {
            writeln!(out, ": {}", label.message)?;
        }
    }
    for note in &diag.notes {
        writeln!(out, "   = note: {note}")?;
    }
    Ok(())
}
