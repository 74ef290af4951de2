//! Check command implementation
//!
//! Diagnostics-only passthrough: runs the analyzer with the selected rules
//! and reports what it found. Never mutates anything.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::App;
use crate::cli::response::{CheckResponse, DiagnosticOutput};
use crate::infra::oracle::Oracle;
use crate::models::oracle::{LintConfig, OracleConfig, RULE_UNDEFINED_NAME};
use crate::services::format::mask;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// File to check
    pub file: PathBuf,

    /// Rule codes to run (comma separated), e.g. F821,F401
    #[arg(long, short = 's', value_delimiter = ',')]
    pub select: Option<Vec<String>>,
}

pub fn execute(args: CheckArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    let abs_file = if args.file.is_absolute() {
        args.file.clone()
    } else {
        app.root().join(&args.file)
    };

    let text = fs::read_to_string(&abs_file)
        .with_context(|| format!("Failed to read {}", abs_file.display()))?;
    // Magic lines would make the analyzer reject the whole document.
    let (_, masked) = mask(&text);

    let config = OracleConfig {
        lint: LintConfig {
            select: args
                .select
                .unwrap_or_else(|| vec![RULE_UNDEFINED_NAME.to_string()]),
            isort: None,
        },
        ..Default::default()
    };

    match app.oracle.check(&masked, &config) {
        Ok(diagnostics) => {
            let response = CheckResponse {
                file: ctx.relative_path(&args.file),
                count: diagnostics.len(),
                diagnostics: diagnostics
                    .iter()
                    .map(DiagnosticOutput::from_diagnostic)
                    .collect(),
            };
            ctx.print_success_flat(response);
        }
        Err(e) => ctx.print_error(&e.to_string()),
    }

    Ok(())
}
