//! Magic-line masking
//!
//! Notebook magics (`%load_ext`, `%%timeit`, ...) are not Python grammar,
//! and the analyzer refuses documents containing them. Before a document
//! enters the loop, every line starting with the magic marker has that
//! marker swapped for a comment marker — same line length, so column
//! positions stay valid — and the original line is recorded. After the loop
//! the masked lines are restored.
//!
//! The map is keyed by line content, not index: an import-sorting pass may
//! relocate a masked line, and it must still be restored. A fix pass that
//! edits the *content* of a masked line defeats restoration; nothing
//! detects that today.

use std::collections::HashMap;

const MAGIC_MARKER: char = '%';
const COMMENT_MARKER: char = '#';

/// Masked-line content to original-line content, for one format operation.
#[derive(Debug, Clone, Default)]
pub struct MaskMap {
    entries: HashMap<String, String>,
}

impl MaskMap {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn original(&self, line: &str) -> Option<&str> {
        self.entries.get(line).map(String::as_str)
    }
}

/// Replace the marker of every magic line with a comment marker.
/// Never changes the number of lines.
pub fn mask(text: &str) -> (MaskMap, String) {
    let mut map = MaskMap::default();
    let masked = text
        .split('\n')
        .map(|line| match line.strip_prefix(MAGIC_MARKER) {
            Some(rest) => {
                let replaced = format!("{COMMENT_MARKER}{rest}");
                map.entries.insert(replaced.clone(), line.to_string());
                replaced
            }
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    (map, masked)
}

/// Restore every line recorded in the map. Never changes the number of
/// lines. For any `text`: `unmask(mask(text).1, &mask(text).0) == text`.
pub fn unmask(text: &str, map: &MaskMap) -> String {
    text.split('\n')
        .map(|line| map.original(line).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}
