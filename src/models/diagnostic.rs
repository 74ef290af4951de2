//! Diagnostic model for analyzer output

use serde::{Deserialize, Serialize};

use super::text::{Range, TextEdit};

/// One reported issue from the analyzer, optionally carrying a fix.
///
/// Only diagnostics with a fix contribute to document mutation; the rest are
/// informational (e.g. naming an undefined symbol) and feed symbol resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    pub range: Range,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

/// An ordered list of edits that resolve a diagnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fix {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub edits: Vec<TextEdit>,
}

impl Diagnostic {
    /// The symbol named by an undefined-name diagnostic, if this is one.
    pub fn undefined_name(&self) -> Option<&str> {
        self.message
            .strip_prefix("Undefined name `")?
            .strip_suffix('`')
    }

    pub fn is_fixable(&self) -> bool {
        self.fix.as_ref().is_some_and(|f| !f.edits.is_empty())
    }

    pub fn display_line(&self) -> u32 {
        self.range.start.line + 1
    }

    pub fn display_column(&self) -> u32 {
        self.range.start.character + 1
    }

    pub fn display_end_line(&self) -> u32 {
        self.range.end.line + 1
    }

    pub fn display_end_column(&self) -> u32 {
        self.range.end.character + 1
    }
}

/// Flatten the fix edits of one analyzer pass into a single raw edit list.
pub fn collect_fix_edits(diagnostics: &[Diagnostic]) -> Vec<TextEdit> {
    diagnostics
        .iter()
        .filter_map(|d| d.fix.as_ref())
        .flat_map(|f| f.edits.iter().cloned())
        .collect()
}
