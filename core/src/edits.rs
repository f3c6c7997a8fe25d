//! Unified-diff to text-edit translation.
//!
//! The formatter reports its result as a unified diff with zero context
//! lines. Rather than replacing the whole document we walk the diff and
//! emit one line-granular [`TextEdit`] per contiguous run of removals and
//! additions, all expressed in original-document coordinates so the client
//! can apply them atomically.

use adder_types::{Position, Range, TextEdit};

use crate::error::RefactorUnavailable;

/// Accumulates one pending edit while scanning a hunk.
#[derive(Debug, Default)]
struct PendingEdit {
    start: Option<u32>,
    replace_lines: u32,
    text: String,
}

impl PendingEdit {
    fn touch(&mut self, cursor: u32) {
        if self.start.is_none() {
            self.start = Some(cursor);
        }
    }

    fn flush(&mut self, edits: &mut Vec<TextEdit>) {
        let Some(start) = self.start.take() else {
            return;
        };
        edits.push(TextEdit {
            range: Range::new(
                Position::new(start, 0),
                Position::new(start + self.replace_lines, 0),
            ),
            new_text: std::mem::take(&mut self.text),
        });
        self.replace_lines = 0;
    }
}

/// Hunk header `@@ -N[,c] +M[,c] @@`: the 1-based original start line and
/// the original-range length (1 when the count is omitted). A zero-length
/// original range names the line *before* the insertion point.
fn hunk_range(line: &str) -> Option<(u32, u32)> {
    let rest = line.strip_prefix("@@ -")?;
    let range = rest.split(' ').next()?;
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

/// Translate a unified diff into line-granular edits against the original
/// document. The two file-header lines are skipped; each `@@` header moves
/// the original-line cursor; removed lines extend the replaced range and
/// advance the cursor; added lines extend the replacement text without
/// advancing it. Adjacent removals and additions within a hunk coalesce
/// into a single edit, flushed at the next context line, hunk header, or
/// end of input.
#[must_use]
pub fn diff_to_edits(diff: &str) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    let mut pending = PendingEdit::default();
    let mut cursor: u32 = 0;

    for line in diff.lines().skip(2) {
        if let Some((start, original_lines)) = hunk_range(line) {
            pending.flush(&mut edits);
            // A pure-insertion hunk reports the line before the insertion
            // point, so its 1-based start is already the 0-based target.
            cursor = if original_lines == 0 {
                start
            } else {
                start.saturating_sub(1)
            };
        } else if let Some(added) = line.strip_prefix('+') {
            pending.touch(cursor);
            pending.text.push_str(added);
            pending.text.push('\n');
        } else if line.starts_with('-') {
            pending.touch(cursor);
            pending.replace_lines += 1;
            cursor += 1;
        } else {
            pending.flush(&mut edits);
            cursor += 1;
        }
    }
    pending.flush(&mut edits);
    edits
}

/// Edits for a refactoring diff. A diff that changes nothing means the
/// requested refactoring does not apply at that position.
pub fn refactor_edits(diff: &str) -> Result<Vec<TextEdit>, RefactorUnavailable> {
    let edits = diff_to_edits(diff);
    if edits.is_empty() {
        return Err(RefactorUnavailable);
    }
    Ok(edits)
}
