//! Doctor command - analyzer availability check

use std::process::Command;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::App;

#[derive(Args, Debug)]
pub struct DoctorArgs {}

#[derive(Serialize)]
struct DoctorResponse {
    analyzer: String,
    installed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    install_command: Option<String>,
}

pub fn execute(_args: DoctorArgs, app: &App) -> Result<()> {
    let ctx = &app.output;
    let command = app.oracle_command();

    let version = Command::new(command)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string());

    let installed = version.is_some();
    ctx.print_success_flat(DoctorResponse {
        analyzer: command.to_string(),
        installed,
        version,
        install_command: if installed {
            None
        } else {
            Some("pip install ruff  # or: uv tool install ruff".to_string())
        },
    });

    Ok(())
}
