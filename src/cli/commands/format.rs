//! Format command implementation

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::App;
use crate::cli::response::{EditOutput, FormatResponse, FormatTreeResponse};
use crate::error::ImportuneError;
use crate::infra::walk::python_files;
use crate::models::notebook::Notebook;
use crate::services::format::{FormatOutcome, FormatRequest, FormatService};

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// File, directory, or notebook to format ("-" reads stdin)
    pub path: String,

    /// Rewrite the file in place instead of only reporting
    #[arg(long, short = 'w')]
    pub write: bool,

    /// Narrow trigger: only add missing imports, never reorganize
    #[arg(long)]
    pub on_type: bool,

    /// Notebook cell index (0-based); formats that cell with the cells
    /// before it as context
    #[arg(long)]
    pub cell: Option<usize>,
}

pub fn execute(args: FormatArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    if args.path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        if args.write {
            anyhow::bail!("--write cannot be combined with stdin input");
        }
        return format_text("<stdin>", None, text, &args, app);
    }

    let path = Path::new(&args.path);
    let abs_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        app.root().join(path)
    };

    if abs_path.is_dir() {
        if args.cell.is_some() || args.on_type {
            anyhow::bail!("--cell and --on-type only apply to single files");
        }
        return format_tree(&abs_path, &args, app);
    }

    let is_notebook = abs_path.extension().and_then(|e| e.to_str()) == Some("ipynb");
    if is_notebook || args.cell.is_some() {
        return format_cell(&abs_path, &args, app);
    }

    let text = fs::read_to_string(&abs_path)
        .with_context(|| format!("Failed to read {}", abs_path.display()))?;
    format_text(
        &ctx.relative_path(&abs_path),
        Some(abs_path.as_path()),
        text,
        &args,
        app,
    )
}

fn format_text(
    label: &str,
    path: Option<&Path>,
    text: String,
    args: &FormatArgs,
    app: &App,
) -> Result<()> {
    let ctx = &app.output;
    let settings = app.settings.snapshot();

    let request = if args.on_type {
        FormatRequest::on_type(text)
    } else {
        FormatRequest::full(text)
    };

    match app.formatter.format_document(&request, &settings) {
        Ok(outcome) => {
            let mut written = false;
            if args.write
                && outcome.changed()
                && let Some(path) = path
            {
                fs::write(path, outcome.apply_to(&request.text))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                written = true;
            }
            ctx.print_success_flat(response_for(label, &request.text, &outcome, written));
        }
        Err(e) => ctx.print_error(&e.to_string()),
    }

    Ok(())
}

fn format_cell(path: &Path, args: &FormatArgs, app: &App) -> Result<()> {
    let ctx = &app.output;
    let settings = app.settings.snapshot();

    let index = args
        .cell
        .ok_or_else(|| anyhow::anyhow!("formatting a notebook requires --cell <INDEX>"))?;
    if args.write {
        anyhow::bail!("--write is not supported for notebooks; apply the returned cell text");
    }

    // The document claims container membership; failing to produce the
    // container here aborts before any edits are attempted.
    let json = fs::read_to_string(path).map_err(|e| {
        ImportuneError::Context(crate::error::ContextError::ContainerUnavailable(
            e.to_string(),
        ))
    })?;
    let context = Notebook::parse(&json)
        .and_then(|notebook| notebook.cell_context(index))
        .map_err(ImportuneError::Context)?;

    let request = FormatRequest::cell(context);
    match app.formatter.format_document(&request, &settings) {
        Ok(outcome) => {
            let label = format!("{}:{}", ctx.relative_path(path), index);
            ctx.print_success_flat(response_for(&label, &request.text, &outcome, false));
        }
        Err(e) => ctx.print_error(&e.to_string()),
    }

    Ok(())
}

fn format_tree(root: &Path, args: &FormatArgs, app: &App) -> Result<()> {
    let ctx = &app.output;
    let settings = app.settings.snapshot();

    let files = python_files(root);
    let mut changed = Vec::new();

    for file in &files {
        let text = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let request = FormatRequest::full(text);
        let outcome = match app.formatter.format_document(&request, &settings) {
            Ok(outcome) => outcome,
            Err(e) => {
                // One broken file must not leave the rest of the tree
                // half-formatted silently.
                ctx.print_error(&format!("{}: {}", ctx.relative_path(file), e));
                return Ok(());
            }
        };
        if outcome.changed() {
            if args.write {
                fs::write(file, outcome.apply_to(&request.text))
                    .with_context(|| format!("Failed to write {}", file.display()))?;
            }
            changed.push(ctx.relative_path(file));
        }
    }

    ctx.print_success_flat(FormatTreeResponse {
        root: ctx.relative_path(root),
        checked: files.len(),
        changed,
        written: args.write,
    });

    Ok(())
}

fn response_for(
    file: &str,
    original: &str,
    outcome: &FormatOutcome,
    written: bool,
) -> FormatResponse {
    match outcome {
        FormatOutcome::NoOp => FormatResponse {
            file: file.to_string(),
            changed: false,
            strategy: "none",
            edits: None,
            text: None,
            written,
        },
        FormatOutcome::Edits(batch) => FormatResponse {
            file: file.to_string(),
            changed: true,
            strategy: "edits",
            edits: Some(batch.iter().map(EditOutput::from_edit).collect()),
            text: Some(outcome.apply_to(original)),
            written,
        },
        FormatOutcome::Replace(text) => FormatResponse {
            file: file.to_string(),
            changed: true,
            strategy: "replace",
            edits: None,
            text: Some(text.clone()),
            written,
        },
    }
}
