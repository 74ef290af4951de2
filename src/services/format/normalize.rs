//! Edit normalization
//!
//! One analyzer pass can report the same region from several diagnostics:
//! exact duplicates (two rules proposing the byte-identical fix) and
//! overlapping ranges (two unused names removed from one import statement).
//! Applying such a list blindly corrupts the document, so every batch is
//! reduced to a disjoint, ordered edit set first.

use crate::models::text::TextEdit;

/// Sort, deduplicate, and merge a raw edit batch.
///
/// Output edits are sorted ascending by (start, end, new_text) and are
/// pairwise non-intersecting, which is what makes bottom-up application
/// correct. Textually identical edits collapse to a single copy — they are
/// one fix proposed twice, and concatenating them would double the
/// replacement. Intersecting edits merge into the union range with their
/// texts concatenated in sorted order; fix ranges within one pass are
/// non-nested line-local replacements, so the concatenation is faithful.
pub fn disjoint_edits(mut edits: Vec<TextEdit>) -> Vec<TextEdit> {
    if edits.len() <= 1 {
        return edits;
    }

    edits.sort_by(|a, b| {
        a.range
            .start
            .cmp(&b.range.start)
            .then(a.range.end.cmp(&b.range.end))
            .then(a.new_text.cmp(&b.new_text))
    });

    let mut disjoint: Vec<TextEdit> = Vec::with_capacity(edits.len());
    let mut edits = edits.into_iter();
    let mut last = edits.next().expect("checked non-empty above");

    for edit in edits {
        if edit == last {
            continue;
        }
        if edit.range.intersects(&last.range) {
            let range = last.range.union(&edit.range);
            let mut new_text = last.new_text;
            new_text.push_str(&edit.new_text);
            last = TextEdit::new(range, new_text);
        } else {
            disjoint.push(std::mem::replace(&mut last, edit));
        }
    }
    disjoint.push(last);

    disjoint
}
