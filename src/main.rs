//! Importune - Convergent auto-import formatter CLI
//!
//! Asks the Ruff analyzer for fix suggestions, merges them into a disjoint
//! edit set, applies them, and repeats until the document stops changing.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use importune::app::App;
use importune::cli::{Cli, Commands};

fn main() {
    // Quiet defaults for agent/editor consumption.
    // Use RUST_LOG=importune=debug for verbose output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "importune=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();

    let cli = Cli::parse();

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            fail(&format!("Failed to initialize: {e}"));
            return;
        }
    };

    if let Err(e) = execute_command(cli.command, &app) {
        fail(&e.to_string());
    }
}

fn execute_command(command: Commands, app: &App) -> anyhow::Result<()> {
    use importune::cli::commands;

    match command {
        Commands::Format(args) => commands::format::execute(args, app),
        Commands::Check(args) => commands::check::execute(args, app),
        Commands::Config(args) => commands::config::execute(args, app),
        Commands::Doctor(args) => commands::doctor::execute(args, app),
    }
}

/// Errors are output as JSON for consistent machine consumption.
fn fail(message: &str) {
    let response = serde_json::json!({
        "success": false,
        "error": message
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&response)
            .unwrap_or_else(|_| format!(r#"{{"success":false,"error":"{message}"}}"#))
    );
    std::process::exit(2);
}
