//! Analyzer configuration model
//!
//! An `OracleConfig` is an opaque, serializable value selecting which rule
//! families run and with which parameters. It is built once per pass and
//! never mutated while a pass is in flight.

use serde::Serialize;

use crate::error::OracleError;

/// Rule selecting undefined names (diagnostics only, no fix).
pub const RULE_UNDEFINED_NAME: &str = "F821";
/// Rule selecting unused imports (fixable).
pub const RULE_UNUSED_IMPORT: &str = "F401";
/// Rule sorting the import block (fixable).
pub const RULE_UNSORTED_IMPORTS: &str = "I001";
/// Rule inserting missing required imports (fixable).
pub const RULE_MISSING_REQUIRED_IMPORT: &str = "I002";

/// One analyzer pass configuration. Field names serialize to the analyzer's
/// own TOML keys; scalars come before tables so the value serializes as a
/// TOML document as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct OracleConfig {
    #[serde(rename = "line-length", skip_serializing_if = "Option::is_none")]
    pub line_length: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatStyle>,

    #[serde(skip_serializing_if = "LintConfig::is_empty")]
    pub lint: LintConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct LintConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub select: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub isort: Option<IsortConfig>,
}

impl LintConfig {
    fn is_empty(&self) -> bool {
        self.select.is_empty() && self.isort.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct IsortConfig {
    #[serde(rename = "required-imports", skip_serializing_if = "Vec::is_empty")]
    pub required_imports: Vec<String>,

    #[serde(rename = "lines-after-imports", skip_serializing_if = "Option::is_none")]
    pub lines_after_imports: Option<i8>,

    #[serde(rename = "combine-as-imports", skip_serializing_if = "Option::is_none")]
    pub combine_as_imports: Option<bool>,

    #[serde(
        rename = "split-on-trailing-comma",
        skip_serializing_if = "Option::is_none"
    )]
    pub split_on_trailing_comma: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct FormatStyle {
    #[serde(
        rename = "skip-magic-trailing-comma",
        skip_serializing_if = "Option::is_none"
    )]
    pub skip_magic_trailing_comma: Option<bool>,
}

impl OracleConfig {
    /// Diagnostics-only pass naming undefined symbols.
    pub fn undefined_names() -> Self {
        Self {
            lint: LintConfig {
                select: vec![RULE_UNDEFINED_NAME.to_string()],
                isort: None,
            },
            ..Default::default()
        }
    }

    /// Fix pass removing unused imports.
    pub fn unused_imports() -> Self {
        Self {
            lint: LintConfig {
                select: vec![RULE_UNUSED_IMPORT.to_string()],
                isort: None,
            },
            ..Default::default()
        }
    }

    /// Flatten to dotted `key = value` override strings for the analyzer CLI.
    pub fn cli_overrides(&self) -> Result<Vec<String>, OracleError> {
        let value = toml::Value::try_from(self)
            .map_err(|e| OracleError::InvalidConfig(e.to_string()))?;
        let mut overrides = Vec::new();
        flatten("", &value, &mut overrides);
        Ok(overrides)
    }
}

fn flatten(path: &str, value: &toml::Value, out: &mut Vec<String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, inner) in table {
                let next = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                flatten(&next, inner, out);
            }
        }
        leaf => out.push(format!("{path} = {leaf}")),
    }
}
