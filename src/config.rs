//! Runtime settings snapshots
//!
//! Settings and the derived symbol-to-import table are rebuilt into a fresh
//! immutable [`Snapshot`] on every configuration change and swapped
//! atomically. A formatting request holds one snapshot for its whole run;
//! nothing is mutated in place while a format is in flight.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::models::config::{ImportsConfig, ImportuneConfig};

/// Conventional aliases shipped with the tool. Users can extend or disable
/// the table via `[imports]` in the config file.
const BUILTIN_IMPORTS: &[(&str, &str)] = &[
    ("pd", "import pandas as pd"),
    ("np", "import numpy as np"),
    ("plt", "import matplotlib.pyplot as plt"),
    ("sns", "import seaborn as sns"),
    ("xr", "import xarray as xr"),
    ("pl", "import polars as pl"),
    ("tf", "import tensorflow as tf"),
    ("torch", "import torch"),
];

/// Immutable symbol-to-import lookup table.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    map: HashMap<String, Vec<String>>,
}

impl ImportTable {
    pub fn build(config: &ImportsConfig) -> Self {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();

        if config.use_builtin {
            for (variable, import) in BUILTIN_IMPORTS {
                map.entry((*variable).to_string())
                    .or_default()
                    .push((*import).to_string());
            }
        }

        for entry in &config.auto {
            let imports = map.entry(entry.variable.clone()).or_default();
            if !imports.contains(&entry.import) {
                imports.push(entry.import.clone());
            }
        }

        Self { map }
    }

    /// All imports mapped to a variable, empty when unmapped.
    pub fn lookup(&self, variable: &str) -> &[String] {
        self.map.get(variable).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Style knobs forwarded into analyzer import passes.
#[derive(Debug, Clone, Default)]
pub struct ImportStyle {
    pub lines_after_imports: i8,
    pub combine_as_imports: bool,
    pub split_on_trailing_comma: Option<bool>,
    pub line_length: Option<u16>,
    pub skip_magic_trailing_comma: Option<bool>,
}

/// One immutable view of the settings, as seen by a single request.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub import_table: ImportTable,
    pub always_import: Vec<String>,
    pub depth_limit: u32,
    pub organize_imports: bool,
    pub remove_unused_imports: bool,
    pub style: ImportStyle,
}

impl Snapshot {
    fn build(config: &ImportuneConfig) -> Self {
        Self {
            import_table: ImportTable::build(&config.imports),
            always_import: config.imports.always_import.clone(),
            depth_limit: config.format.depth_limit,
            organize_imports: config.format.organize_imports,
            remove_unused_imports: config.format.remove_unused_imports,
            style: ImportStyle {
                lines_after_imports: config.format.lines_after_imports,
                combine_as_imports: config.format.combine_as_imports,
                split_on_trailing_comma: config.format.split_on_trailing_comma,
                line_length: config.format.line_length,
                skip_magic_trailing_comma: config.format.skip_magic_trailing_comma,
            },
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::build(&ImportuneConfig::default())
    }
}

/// Holder of the current snapshot. `reload` swaps in a freshly built one;
/// requests already holding the old Arc keep seeing it unchanged.
pub struct SettingsStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SettingsStore {
    pub fn new(config: &ImportuneConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::build(config))),
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .map(|guard| Arc::clone(&guard))
            .unwrap_or_default()
    }

    pub fn reload(&self, config: &ImportuneConfig) {
        let fresh = Arc::new(Snapshot::build(config));
        if let Ok(mut guard) = self.current.write() {
            *guard = fresh;
        }
    }
}
