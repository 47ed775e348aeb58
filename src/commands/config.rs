use anyhow::{Context as _, Result};

use crate::Context;
use crate::cli::ConnectionArgs;
use crate::ui;

/// Show the effective client configuration with the secret masked
pub fn run(_ctx: &Context, conn: &ConnectionArgs) -> Result<()> {
    let config = conn.client_config();

    ui::header("Connection");
    println!();
    let rendered =
        toml::to_string_pretty(&config.redacted()).context("Failed to serialize config")?;
    for line in rendered.lines() {
        println!("  {line}");
    }
    println!();
    ui::kv("Endpoint", &config.endpoint());
    println!();

    match config.validate() {
        Ok(()) => ui::success("Configuration is complete"),
        Err(e) => {
            ui::warn(&e.to_string());
            ui::dim(e.category().advice());
        }
    }
    Ok(())
}
