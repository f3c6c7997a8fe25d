//! Out-of-process type checker invocation and output parsing.
//!
//! The type checker runs as a separate executable against either the saved
//! file or the in-memory buffer text. This module builds its argument
//! vector and parses its line-oriented report; spawning and timeouts live
//! with the session, which owns the process machinery.

use std::path::{Path, PathBuf};

use adder_types::{Diagnostic, DiagnosticSeverity, Position, Range};

use crate::documents::Document;

/// What the checker should read: the file on disk, or buffer text passed
/// on the command line for not-yet-saved changes.
#[derive(Debug, Clone)]
pub enum CheckTarget {
    File(PathBuf),
    Source { path: PathBuf, text: String },
}

impl CheckTarget {
    /// The path findings are reported against. Source-mode reports may
    /// also arrive under the checker's placeholder module name.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Source { path, .. } => path,
        }
    }
}

/// Argument vector for one run. The interpreter and language version pin
/// the checker to the environment the buffer is edited against; the
/// remaining flags force plain, column-annotated, one-line-per-finding
/// output that [`parse_output`] understands.
#[must_use]
pub fn build_args(
    python_executable: &Path,
    python_version: &str,
    config: Option<&Path>,
    target: &CheckTarget,
) -> Vec<String> {
    let mut args = vec![
        "--python-executable".to_string(),
        python_executable.display().to_string(),
        "--python-version".to_string(),
        python_version.to_string(),
    ];
    if let Some(config) = config {
        args.push("--config-file".to_string());
        args.push(config.display().to_string());
    }
    args.extend(
        [
            "--hide-error-context",
            "--show-column-numbers",
            "--show-error-codes",
            "--no-pretty",
            "--no-error-summary",
        ]
        .map(str::to_string),
    );
    match target {
        CheckTarget::File(path) => args.push(path.display().to_string()),
        CheckTarget::Source { text, .. } => {
            args.push("--command".to_string());
            args.push(text.clone());
        }
    }
    args
}

/// Parse the checker's report into diagnostics. Each finding line is
/// `file:line:column: level: message`; anything shorter, or attributed to
/// another file, is skipped. `note` findings map to hints, everything else
/// to warnings; the range runs from the finding's column to the end of its
/// source line, as with the other line-oriented checkers.
#[must_use]
pub fn parse_output(output: &str, target: &CheckTarget, doc: &Document) -> Vec<Diagnostic> {
    let own_path = target.path().display().to_string();
    let mut diagnostics = Vec::new();
    for line in output.lines() {
        let fields: Vec<&str> = line.splitn(5, ':').collect();
        let [file, row, col, level, message] = fields[..] else {
            continue;
        };
        if file != own_path && file != "<string>" {
            continue;
        }
        let (Ok(row), Ok(col)) = (row.trim().parse::<u32>(), col.trim().parse::<u32>()) else {
            continue;
        };
        let line_idx = row.saturating_sub(1);
        let severity = if level.trim() == "note" {
            DiagnosticSeverity::Hint
        } else {
            DiagnosticSeverity::Warning
        };
        diagnostics.push(Diagnostic {
            range: Range::new(
                Position::new(line_idx, col.saturating_sub(1)),
                Position::new(line_idx, doc.line_len(line_idx as usize)),
            ),
            severity,
            code: None,
            source: "mypy",
            message: message.trim().to_string(),
        });
    }
    diagnostics
}
