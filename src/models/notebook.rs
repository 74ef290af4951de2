//! Notebook container model
//!
//! Parses the nbformat-4 JSON layout far enough to recover ordered cell
//! sources. Outputs, execution counts, and metadata are ignored.

use serde::Deserialize;

use crate::error::ContextError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Code,
    Markup,
    Raw,
}

/// One ordered unit of a multi-cell container.
#[derive(Debug, Clone)]
pub struct Cell {
    pub kind: CellKind,
    pub text: String,
}

impl Cell {
    pub fn code(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Code,
            text: text.into(),
        }
    }

    pub fn markup(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Markup,
            text: text.into(),
        }
    }
}

/// A parsed notebook: ordered cells, nothing else.
#[derive(Debug, Clone)]
pub struct Notebook {
    pub cells: Vec<Cell>,
}

impl Notebook {
    pub fn parse(json: &str) -> Result<Self, ContextError> {
        let raw: RawNotebook =
            serde_json::from_str(json).map_err(|e| ContextError::NotANotebook(e.to_string()))?;
        let cells = raw
            .cells
            .into_iter()
            .map(|cell| Cell {
                kind: match cell.cell_type.as_str() {
                    "code" => CellKind::Code,
                    "markdown" => CellKind::Markup,
                    _ => CellKind::Raw,
                },
                text: cell.source.into_text(),
            })
            .collect();
        Ok(Self { cells })
    }

    /// View the notebook as the container of the cell at `current`.
    pub fn cell_context(self, current: usize) -> Result<CellContext, ContextError> {
        if current >= self.cells.len() {
            return Err(ContextError::CellOutOfRange {
                index: current,
                count: self.cells.len(),
            });
        }
        Ok(CellContext {
            cells: self.cells,
            current,
        })
    }
}

/// The container view handed to context aggregation: all cells in container
/// order plus the index of the cell being formatted.
#[derive(Debug, Clone)]
pub struct CellContext {
    pub cells: Vec<Cell>,
    pub current: usize,
}

impl CellContext {
    pub fn current_cell(&self) -> &Cell {
        &self.cells[self.current]
    }

    /// Code cells from the first through the current one, in order.
    /// Markup and raw cells are not part of the analyzed grammar.
    pub fn code_through_current(&self) -> impl Iterator<Item = &Cell> {
        self.cells[..=self.current]
            .iter()
            .filter(|c| c.kind == CellKind::Code)
    }
}

#[derive(Deserialize)]
struct RawNotebook {
    cells: Vec<RawCell>,
}

#[derive(Deserialize)]
struct RawCell {
    cell_type: String,
    source: RawSource,
}

/// nbformat stores cell sources either as one string or a list of lines.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Joined(String),
    Lines(Vec<String>),
}

impl RawSource {
    fn into_text(self) -> String {
        match self {
            Self::Joined(text) => text,
            Self::Lines(lines) => lines.concat(),
        }
    }
}
