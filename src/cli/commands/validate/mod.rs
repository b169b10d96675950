pub mod handler;

use super::OutputFormat;
use clap::Args;
use std::path::PathBuf;

pub use handler::handle_validate_command;

#[derive(Args)]
pub struct ValidateCommands {
    /// Form definition (JSON)
    pub form: PathBuf,

    /// Submitted values (JSON object keyed by field name or id)
    pub values: PathBuf,

    /// Only validate this page
    #[arg(short, long)]
    pub page: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}
