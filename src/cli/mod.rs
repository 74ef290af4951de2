//! CLI module for Importune
//!
//! Provides command-line interface using clap derive macros.

pub mod commands;
pub mod output;
pub mod response;

pub use output::OutputContext;

use clap::{Parser, Subcommand};

use commands::{
    check::CheckArgs, config::ConfigArgs, doctor::DoctorArgs, format::FormatArgs,
};

const LONG_ABOUT: &str = r#"
Importune - Convergent auto-import formatter for Python

Importune asks the Ruff analyzer for fix suggestions, merges them into a
consistent edit set, and repeats until the document stops changing. Missing
imports are resolved through a configurable symbol-to-import table.

QUICK START:
  1. Format a file:            importune format src/pipeline.py --write
  2. Format from stdin:        cat snippet.py | importune format -
  3. Format a notebook cell:   importune format analysis.ipynb --cell 2
  4. See what is undefined:    importune check src/pipeline.py

CONFIG:
  importune config init        # write .importune.toml
  importune config show        # effective merged configuration

For more information: https://github.com/importune/importune
"#;

/// Importune - Convergent auto-import formatter for Python
#[derive(Parser, Debug)]
#[command(name = "importune")]
#[command(author, version, about, long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
#[command(after_help = "Use 'importune <COMMAND> --help' for more information about a command.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (show debug info)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format a file, directory, or notebook cell to its import fixed point
    Format(FormatArgs),

    /// Run analyzer diagnostics without changing anything
    Check(CheckArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Check that the analyzer binary is available
    Doctor(DoctorArgs),
}
