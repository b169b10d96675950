pub mod config;
pub mod move_field;
pub mod rules;
pub mod types;
pub mod validate;

pub use config::{ConfigCommands, handle_config_command};
pub use move_field::{MoveCommands, handle_move_command};
pub use rules::{CheckRulesCommands, RulesCommands, handle_check_rules_command, handle_rules_command};
pub use types::{TypesCommands, handle_types_command};
pub use validate::{ValidateCommands, handle_validate_command};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human readable table (default)
    #[default]
    Table,
    /// JSON
    Json,
}

/// Read and parse a JSON file
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON in: {}", path.display()))
}
