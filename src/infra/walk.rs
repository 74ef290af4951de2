//! Python file discovery with .gitignore integration
//!
//! Uses the `ignore` crate (from ripgrep) so directory formats respect the
//! same exclusions the rest of the toolchain does.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// Collect Python source files under `root`, gitignore-aware, sorted for
/// deterministic output.
pub fn python_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == "py" || ext == "pyi")
        })
        .collect();
    files.sort();
    files
}
