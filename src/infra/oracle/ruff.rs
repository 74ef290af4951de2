//! Ruff subprocess adapter
//!
//! Invokes `ruff check` on a text snapshot piped through stdin, with the
//! pass configuration handed over as inline `--config` overrides on top of
//! `--isolated` (project configuration must not leak into a pass).
//!
//! Ruff reports 1-based (row, column) locations; they are converted to the
//! 0-based positions of the rest of the engine right here at the boundary.

use std::io::Write;
use std::process::{Command, Stdio};

use serde::Deserialize;

use crate::error::OracleError;
use crate::models::diagnostic::{Diagnostic, Fix};
use crate::models::oracle::OracleConfig;
use crate::models::text::{Position, Range, TextEdit};

use super::Oracle;

/// Exit code Ruff uses for usage and configuration errors.
const EXIT_CONFIG_ERROR: i32 = 2;

pub struct RuffOracle {
    command: String,
}

impl RuffOracle {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Oracle for RuffOracle {
    fn check(&self, text: &str, config: &OracleConfig) -> Result<Vec<Diagnostic>, OracleError> {
        let mut cmd = Command::new(&self.command);
        cmd.args([
            "check",
            "-",
            "--output-format",
            "json",
            "--isolated",
            "--no-cache",
            "--quiet",
            "--stdin-filename",
            "importune.py",
        ]);
        for override_ in config.cli_overrides()? {
            cmd.arg("--config").arg(override_);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(analyzer = %self.command, "invoking analyzer pass");

        let mut child = cmd.spawn().map_err(|source| OracleError::Spawn {
            command: self.command.clone(),
            source,
        })?;

        if let Some(stdin) = child.stdin.take() {
            // A closed pipe here means the analyzer died early; the exit
            // status below carries the real error.
            let mut stdin = stdin;
            let _ = stdin.write_all(text.as_bytes());
        }

        let output = child.wait_with_output()?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        match output.status.code() {
            // 0: clean, 1: diagnostics found. Both carry a JSON body.
            Some(0) | Some(1) => {}
            Some(EXIT_CONFIG_ERROR) => {
                return Err(OracleError::InvalidConfig(stderr.trim().to_string()));
            }
            _ => {
                return Err(OracleError::Failed {
                    status: output.status.to_string(),
                    stderr: stderr.trim().to_string(),
                });
            }
        }

        let raw: Vec<RawDiagnostic> = serde_json::from_slice(&output.stdout)?;
        Ok(raw.into_iter().map(Diagnostic::from).collect())
    }
}

#[derive(Debug, Deserialize)]
struct RawDiagnostic {
    code: Option<String>,
    message: String,
    location: RawLocation,
    end_location: Option<RawLocation>,
    fix: Option<RawFix>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RawLocation {
    row: u32,
    column: u32,
}

#[derive(Debug, Deserialize)]
struct RawFix {
    message: Option<String>,
    #[serde(default)]
    edits: Vec<RawEdit>,
}

#[derive(Debug, Deserialize)]
struct RawEdit {
    content: Option<String>,
    location: RawLocation,
    end_location: RawLocation,
}

impl From<RawLocation> for Position {
    fn from(loc: RawLocation) -> Self {
        Position::from_oracle(loc.row, loc.column)
    }
}

impl From<RawDiagnostic> for Diagnostic {
    fn from(raw: RawDiagnostic) -> Self {
        let start: Position = raw.location.into();
        let end = raw.end_location.map(Position::from).unwrap_or(start);
        Self {
            code: raw.code,
            message: raw.message,
            range: Range::new(start, end),
            fix: raw.fix.map(|fix| Fix {
                message: fix.message,
                edits: fix
                    .edits
                    .into_iter()
                    .map(|edit| {
                        TextEdit::new(
                            Range::new(edit.location.into(), edit.end_location.into()),
                            edit.content.unwrap_or_default(),
                        )
                    })
                    .collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Captured from `ruff check - --output-format json` on a file missing a
    // required import.
    const SAMPLE: &str = r#"[
        {
            "cell": null,
            "code": "I002",
            "end_location": {"column": 1, "row": 1},
            "filename": "importune.py",
            "fix": {
                "applicability": "safe",
                "edits": [
                    {
                        "content": "import pandas as pd\n",
                        "end_location": {"column": 1, "row": 1},
                        "location": {"column": 1, "row": 1}
                    }
                ],
                "message": "Insert required import: `import pandas as pd`"
            },
            "location": {"column": 1, "row": 1},
            "message": "Missing required import: `import pandas as pd`",
            "noqa_row": 1,
            "url": "https://docs.astral.sh/ruff/rules/missing-required-import"
        },
        {
            "cell": null,
            "code": "F821",
            "end_location": {"column": 11, "row": 2},
            "filename": "importune.py",
            "fix": null,
            "location": {"column": 9, "row": 2},
            "message": "Undefined name `pd`",
            "noqa_row": 2,
            "url": null
        }
    ]"#;

    #[test]
    fn test_parses_and_rebases_locations() {
        let raw: Vec<RawDiagnostic> = serde_json::from_str(SAMPLE).unwrap();
        let diagnostics: Vec<Diagnostic> = raw.into_iter().map(Diagnostic::from).collect();
        assert_eq!(diagnostics.len(), 2);

        let fix = diagnostics[0].fix.as_ref().unwrap();
        assert_eq!(fix.edits.len(), 1);
        assert_eq!(fix.edits[0].new_text, "import pandas as pd\n");
        assert_eq!(fix.edits[0].range.start, Position::new(0, 0));
        assert!(fix.edits[0].range.is_empty());

        assert_eq!(diagnostics[1].undefined_name(), Some("pd"));
        assert_eq!(diagnostics[1].range.start, Position::new(1, 8));
        assert_eq!(diagnostics[1].range.end, Position::new(1, 10));
        assert!(diagnostics[1].fix.is_none());
    }

    #[test]
    fn test_missing_end_location_collapses_to_point() {
        let raw: RawDiagnostic = serde_json::from_str(
            r#"{
                "code": "F821",
                "message": "Undefined name `np`",
                "location": {"column": 5, "row": 3},
                "end_location": null,
                "fix": null
            }"#,
        )
        .unwrap();
        let diagnostic = Diagnostic::from(raw);
        assert!(diagnostic.range.is_empty());
        assert_eq!(diagnostic.range.start, Position::new(2, 4));
    }

    #[test]
    fn test_fix_edit_without_content_deletes() {
        let raw: RawDiagnostic = serde_json::from_str(
            r#"{
                "code": "F401",
                "message": "`os` imported but unused",
                "location": {"column": 1, "row": 1},
                "end_location": {"column": 10, "row": 1},
                "fix": {
                    "message": "Remove unused import: `os`",
                    "edits": [
                        {
                            "content": null,
                            "location": {"column": 1, "row": 1},
                            "end_location": {"column": 1, "row": 2}
                        }
                    ]
                }
            }"#,
        )
        .unwrap();
        let diagnostic = Diagnostic::from(raw);
        let edits = &diagnostic.fix.as_ref().unwrap().edits;
        assert_eq!(edits[0].new_text, "");
        assert_eq!(edits[0].range.end, Position::new(1, 0));
    }
}
