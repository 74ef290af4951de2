//! Config command implementation

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::app::App;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the merged effective configuration
    Show,

    /// Print the config file path
    Path {
        /// Global config instead of the project one
        #[arg(long)]
        global: bool,
    },

    /// Write a default config file
    Init {
        /// Global config instead of the project one
        #[arg(long)]
        global: bool,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Serialize)]
struct PathResponse {
    path: String,
    exists: bool,
}

pub fn execute(args: ConfigArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    match args.command {
        ConfigCommand::Show => match app.config_service.load(false) {
            Ok(config) => ctx.print_success_flat(config),
            Err(e) => ctx.print_error(&e.to_string()),
        },

        ConfigCommand::Path { global } => {
            let path = app.config_service.config_path(global);
            ctx.print_success_flat(PathResponse {
                exists: path.exists(),
                path: path.display().to_string(),
            });
        }

        ConfigCommand::Init { global, force } => {
            match app.config_service.init(global, force) {
                Ok(path) => ctx.print_success_flat(PathResponse {
                    exists: true,
                    path: path.display().to_string(),
                }),
                Err(e) => ctx.print_error(&e.to_string()),
            }
        }
    }

    Ok(())
}
