use super::commands::config::ConfigCommands;
use super::commands::move_field::MoveCommands;
use super::commands::rules::{CheckRulesCommands, RulesCommands};
use super::commands::types::TypesCommands;
use super::commands::validate::ValidateCommands;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "formcraft")]
#[command(about = "Inspect form field types and validation rules, validate and reorder forms")]
pub struct Cli {
    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Field type whose rules apply to types without rules of their own
    #[arg(long, global = true, value_name = "TYPE")]
    pub fallback_type: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered field types
    Types(TypesCommands),
    /// Show the validation rules applicable to a field type
    Rules(RulesCommands),
    /// Check a rule selection for conflicts and missing dependencies
    CheckRules(CheckRulesCommands),
    /// Validate submitted values against a form definition
    Validate(ValidateCommands),
    /// Move a field as a drag and drop would
    Move(MoveCommands),
    /// Show or initialise the configuration file
    Config(ConfigCommands),
}
