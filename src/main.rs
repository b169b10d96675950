use anyhow::Result;
use clap::Parser;
use log::{debug, info};

mod cli;

use cli::{Cli, Commands};
use cli::commands::{
    handle_check_rules_command, handle_config_command, handle_move_command, handle_rules_command,
    handle_types_command, handle_validate_command,
};
use formcraft::model::FieldType;
use formcraft::{EngineConfig, FormEngine};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => EngineConfig::get_config_path()?,
    };
    let mut config = EngineConfig::load_with_env(&config_path)?;
    if let Some(fallback) = &cli.fallback_type {
        config.fallback_type = FieldType::from(fallback.as_str());
    }

    init_logging(&cli, &config)?;
    info!("Starting formcraft");
    debug!("Effective config: {:?}", config);

    let engine = FormEngine::from_config(&config)?;

    match cli.command {
        Commands::Types(args) => handle_types_command(&engine, args),
        Commands::Rules(args) => handle_rules_command(&engine, args),
        Commands::CheckRules(args) => handle_check_rules_command(&engine, args),
        Commands::Validate(args) => handle_validate_command(&engine, args),
        Commands::Move(args) => handle_move_command(args),
        Commands::Config(args) => handle_config_command(&config, &config_path, args),
    }
}

/// RUST_LOG wins over the configured level; default is warn
fn init_logging(cli: &Cli, config: &EngineConfig) -> Result<()> {
    let default_filter = config.log_level.as_deref().unwrap_or("warn");
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));

    if let Some(path) = &cli.log_file {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }
    builder.init();
    Ok(())
}
