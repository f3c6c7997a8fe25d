//! Mapping of checker findings into LSP diagnostics.
//!
//! A validation pass runs the checkers in strict order: engine syntax
//! errors first (any at all short-circuit the whole pass), then pyflakes,
//! then pycodestyle, then -- when enabled -- the out-of-process type
//! checker. Each mapper here is pure; the session drives the sequencing and
//! publishes either the syntax-only list or the full accumulated list,
//! never a partial one.

use std::collections::HashSet;

use adder_types::{Diagnostic, DiagnosticSeverity, Position, Range};

use crate::documents::Document;
use crate::engine::{FlakeFinding, StyleFinding, SyntaxErrorInfo};

/// Map engine syntax errors. Non-empty output means the pass stops here.
#[must_use]
pub fn syntax_diagnostics(errors: &[SyntaxErrorInfo]) -> Vec<Diagnostic> {
    errors
        .iter()
        .map(|e| Diagnostic {
            range: Range::new(
                Position::new(e.line.saturating_sub(1), e.column),
                Position::new(e.until_line.saturating_sub(1), e.until_column),
            ),
            severity: DiagnosticSeverity::Error,
            code: None,
            source: "syntax",
            message: e.message.clone(),
        })
        .collect()
}

/// Map pyflakes findings. Categories on the escalation allow-list become
/// errors, everything else a warning; the range runs from the finding's
/// column to the end of its source line.
#[must_use]
pub fn flake_diagnostics(
    findings: &[FlakeFinding],
    doc: &Document,
    escalate: &[String],
) -> Vec<Diagnostic> {
    findings
        .iter()
        .map(|f| {
            let line = f.line.saturating_sub(1);
            let severity = if escalate.iter().any(|c| c == &f.category) {
                DiagnosticSeverity::Error
            } else {
                DiagnosticSeverity::Warning
            };
            Diagnostic {
                range: Range::new(
                    Position::new(line, f.column),
                    Position::new(line, doc.line_len(line as usize)),
                ),
                severity,
                code: None,
                source: "pyflakes",
                message: f.message.clone(),
            }
        })
        .collect()
}

/// Map pycodestyle findings, suppressing codes in the per-call expected
/// set. The checker applied its own ignore list before we ever see a
/// finding.
#[must_use]
pub fn style_diagnostics(
    findings: &[StyleFinding],
    doc: &Document,
    expected: &HashSet<String>,
) -> Vec<Diagnostic> {
    findings
        .iter()
        .filter(|f| !expected.contains(&f.code))
        .map(|f| {
            let line = f.line.saturating_sub(1);
            Diagnostic {
                range: Range::new(
                    Position::new(line, f.column),
                    Position::new(line, doc.line_len(line as usize)),
                ),
                severity: DiagnosticSeverity::Warning,
                code: Some(f.code.clone()),
                source: "pycodestyle",
                message: f.message.clone(),
            }
        })
        .collect()
}
