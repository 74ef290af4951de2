//! Text Common Types
//!
//! Single source of truth for positions, ranges, and edits.
//! Every edit is valid only against the text snapshot it was produced for.

use serde::{Deserialize, Serialize};

/// Position within a document (0-indexed), ordered by line then character.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default, Hash,
)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Convert the analyzer's 1-indexed (row, column) to a 0-indexed position.
    pub fn from_oracle(row: u32, column: u32) -> Self {
        Self {
            line: row.saturating_sub(1),
            character: column.saturating_sub(1),
        }
    }

    /// Convert a 0-indexed position to 1-indexed display coordinates.
    pub fn to_display(&self) -> (u32, u32) {
        (self.line + 1, self.character + 1)
    }
}

/// Range within a document. `start == end` is an insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Convert a single position to an empty range.
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Overlap of two ranges: [max(start), min(end)], or None if disjoint.
    pub fn intersection(&self, other: &Range) -> Option<Range> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start <= end {
            Some(Range::new(start, end))
        } else {
            None
        }
    }

    /// True only for a non-empty overlap. Ranges that merely touch at a
    /// boundary point do not intersect.
    pub fn intersects(&self, other: &Range) -> bool {
        self.intersection(other).is_some_and(|r| !r.is_empty())
    }

    /// Covering range: (min start, max end).
    pub fn union(&self, other: &Range) -> Range {
        Range::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Text edit unit: replace `range` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(range: Range, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    /// Pure insertion at a position.
    pub fn insertion(pos: Position, new_text: impl Into<String>) -> Self {
        Self::new(Range::point(pos), new_text)
    }
}
