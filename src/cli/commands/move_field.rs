use super::read_json;
use formcraft::model::FormConfig;
use formcraft::reorder::{Edge, MoveRequest, compute_reorder};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::*;
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct MoveCommands {
    /// Form definition (JSON)
    pub form: PathBuf,

    /// Id of the field to move
    #[arg(long)]
    pub field: String,

    /// Page to drop the field on
    #[arg(long)]
    pub to_page: String,

    /// Field the pointer is over; omit to drop on the page itself
    #[arg(long)]
    pub over: Option<String>,

    /// Half of the hovered field
    #[arg(long, value_enum, default_value_t = EdgeArg::Top)]
    pub edge: EdgeArg,

    /// Write the updated form here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EdgeArg {
    Top,
    Bottom,
}

impl From<EdgeArg> for Edge {
    fn from(edge: EdgeArg) -> Self {
        match edge {
            EdgeArg::Top => Edge::Top,
            EdgeArg::Bottom => Edge::Bottom,
        }
    }
}

pub fn handle_move_command(args: MoveCommands) -> Result<()> {
    let mut form: FormConfig = read_json(&args.form)?;

    let request = match &args.over {
        Some(target) => {
            MoveRequest::onto_field(&form, &args.field, &args.to_page, target, args.edge.into())
        }
        None => MoveRequest::onto_page(&form, &args.field, &args.to_page),
    }
    .with_context(|| {
        format!(
            "Cannot move '{}' to page '{}': field, page or target not found",
            args.field, args.to_page
        )
    })?;

    match compute_reorder(&form, &request) {
        Some(reorder) => {
            let pages = reorder.affected_pages().join(", ");
            reorder.apply(&mut form)?;
            eprintln!("{} moved {} (pages: {})", "✓".green(), args.field.cyan(), pages);
        }
        None => eprintln!("{}", "Drop leaves the order unchanged".dimmed()),
    }

    let json = serde_json::to_string_pretty(&form).context("Failed to serialize form")?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write output to: {}", path.display()))?;
            eprintln!("Saved to {}", path.display().to_string().bright_green());
        }
        None => println!("{}", json),
    }
    Ok(())
}
