//! Edit application
//!
//! Applies a disjoint, sorted edit batch to a text snapshot. Edits are
//! processed in descending order: an edit can change the line count of
//! everything at or after its start, and working bottom-up keeps the
//! coordinates of every not-yet-applied edit valid, because they all lie
//! strictly above the edit just applied.

use crate::models::text::TextEdit;

/// Apply a batch produced by [`super::normalize::disjoint_edits`] against
/// the same snapshot of `text`.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> String {
    let mut current = text.to_string();
    for edit in edits.iter().rev() {
        current = apply_edit(&current, edit);
    }
    current
}

fn apply_edit(text: &str, edit: &TextEdit) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let start_line = (edit.range.start.line as usize).min(lines.len() - 1);
    let end_line = (edit.range.end.line as usize).min(lines.len() - 1);

    let mut patched = String::with_capacity(text.len() + edit.new_text.len());
    for line in &lines[..start_line] {
        patched.push_str(line);
        patched.push('\n');
    }
    patched.push_str(head(lines[start_line], edit.range.start.character as usize));
    patched.push_str(&edit.new_text);
    patched.push_str(tail(lines[end_line], edit.range.end.character as usize));
    for line in &lines[end_line + 1..] {
        patched.push('\n');
        patched.push_str(line);
    }
    patched
}

/// The part of `line` before the column, counted in characters.
fn head(line: &str, column: usize) -> &str {
    &line[..byte_index(line, column)]
}

/// The part of `line` at and after the column.
fn tail(line: &str, column: usize) -> &str {
    &line[byte_index(line, column)..]
}

fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(index, _)| index)
        .unwrap_or(line.len())
}
