use formcraft::config::EngineConfig;
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use std::path::Path;

#[derive(Args)]
pub struct ConfigCommands {
    /// Write the default configuration if no file exists yet
    #[arg(long)]
    pub init: bool,
}

pub fn handle_config_command(config: &EngineConfig, path: &Path, args: ConfigCommands) -> Result<()> {
    if args.init {
        if path.exists() {
            println!("Config file already exists: {}", path.display().to_string().cyan());
        } else {
            EngineConfig::default().save_to(path)?;
            println!("Wrote default config to {}", path.display().to_string().bright_green());
        }
        return Ok(());
    }

    println!("Config file: {}", path.display().to_string().cyan());
    if !path.exists() {
        println!("{}", "(not present, using defaults)".dimmed());
    }
    println!();
    let content = toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;
    print!("{}", content);
    Ok(())
}
