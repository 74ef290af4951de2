//! Configuration model for Importune

use serde::{Deserialize, Serialize};

/// Importune configuration, loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImportuneConfig {
    #[serde(default)]
    pub format: FormatConfig,

    #[serde(default)]
    pub imports: ImportsConfig,

    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

/// Formatting behavior and analyzer style knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Hard bound on convergence iterations.
    #[serde(default = "defaults::depth_limit")]
    pub depth_limit: u32,

    /// Sort the import block on full-document formats.
    #[serde(default = "defaults::organize_imports")]
    pub organize_imports: bool,

    /// Drop unused imports on full-document formats.
    #[serde(default)]
    pub remove_unused_imports: bool,

    #[serde(default = "defaults::lines_after_imports")]
    pub lines_after_imports: i8,

    #[serde(default = "defaults::combine_as_imports")]
    pub combine_as_imports: bool,

    #[serde(default)]
    pub split_on_trailing_comma: Option<bool>,

    #[serde(default)]
    pub line_length: Option<u16>,

    #[serde(default)]
    pub skip_magic_trailing_comma: Option<bool>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            depth_limit: defaults::depth_limit(),
            organize_imports: defaults::organize_imports(),
            remove_unused_imports: false,
            lines_after_imports: defaults::lines_after_imports(),
            combine_as_imports: defaults::combine_as_imports(),
            split_on_trailing_comma: None,
            line_length: None,
            skip_magic_trailing_comma: None,
        }
    }
}

/// Symbol-to-import mappings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportsConfig {
    /// Include the conventional scientific-stack aliases (pd, np, plt, ...).
    #[serde(default = "defaults::use_builtin")]
    pub use_builtin: bool,

    /// User mappings, appended after the builtin table.
    #[serde(default)]
    pub auto: Vec<AutoImport>,

    /// Imports forced into every full-document format of a standalone file.
    #[serde(default)]
    pub always_import: Vec<String>,
}

impl Default for ImportsConfig {
    fn default() -> Self {
        Self {
            use_builtin: defaults::use_builtin(),
            auto: Vec::new(),
            always_import: Vec::new(),
        }
    }
}

/// One symbol-to-import mapping. A variable may map to several imports by
/// repeating the variable across entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutoImport {
    pub variable: String,
    pub import: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Analyzer executable. Resolved through PATH unless absolute.
    #[serde(default = "defaults::analyzer_command")]
    pub command: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            command: defaults::analyzer_command(),
        }
    }
}

mod defaults {
    pub fn depth_limit() -> u32 {
        5
    }
    pub fn organize_imports() -> bool {
        true
    }
    pub fn lines_after_imports() -> i8 {
        2
    }
    pub fn combine_as_imports() -> bool {
        true
    }
    pub fn use_builtin() -> bool {
        true
    }
    pub fn analyzer_command() -> String {
        "ruff".to_string()
    }
}
