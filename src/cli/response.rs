//! Response types for CLI output
//!
//! All types implement Serialize for consistent JSON output. Positions are
//! reported 1-indexed for display.

use serde::Serialize;

use crate::models::diagnostic::Diagnostic;
use crate::models::text::TextEdit;

/// One edit, in display coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct EditOutput {
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub new_text: String,
}

impl EditOutput {
    pub fn from_edit(edit: &TextEdit) -> Self {
        let (line, column) = edit.range.start.to_display();
        let (end_line, end_column) = edit.range.end.to_display();
        Self {
            line,
            column,
            end_line,
            end_column,
            new_text: edit.new_text.clone(),
        }
    }
}

/// Result of formatting one document.
#[derive(Debug, Clone, Serialize)]
pub struct FormatResponse {
    pub file: String,
    pub changed: bool,
    /// "none", "edits", or "replace"
    pub strategy: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edits: Option<Vec<EditOutput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub written: bool,
}

/// Result of formatting a directory tree.
#[derive(Debug, Clone, Serialize)]
pub struct FormatTreeResponse {
    pub root: String,
    pub checked: usize,
    pub changed: Vec<String>,
    pub written: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub fixable: bool,
}

impl DiagnosticOutput {
    pub fn from_diagnostic(diagnostic: &Diagnostic) -> Self {
        Self {
            code: diagnostic.code.clone(),
            message: diagnostic.message.clone(),
            line: diagnostic.display_line(),
            column: diagnostic.display_column(),
            end_line: diagnostic.display_end_line(),
            end_column: diagnostic.display_end_column(),
            fixable: diagnostic.is_fixable(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    pub file: String,
    pub count: usize,
    pub diagnostics: Vec<DiagnosticOutput>,
}
