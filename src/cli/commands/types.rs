use super::OutputFormat;
use formcraft::engine::FormEngine;
use formcraft::registry::FieldTypeDefinition;
use anyhow::{Context, Result};
use clap::Args;
use colored::*;

#[derive(Args)]
pub struct TypesCommands {
    /// Only list types of this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Case-insensitive search over names, descriptions and tags
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub fn handle_types_command(engine: &FormEngine, args: TypesCommands) -> Result<()> {
    if let Some(category) = &args.category {
        if !engine.categories().contains(category) {
            anyhow::bail!(
                "Unknown category '{}'. Available: {}",
                category,
                engine
                    .categories()
                    .all()
                    .iter()
                    .map(|c| c.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    let keep = |def: &FieldTypeDefinition| {
        args.category.as_ref().is_none_or(|c| &def.category == c)
            && args
                .search
                .as_ref()
                .is_none_or(|q| q.trim().is_empty() || def.matches_query(q.trim()))
    };

    let groups: Vec<_> = engine
        .grouped_field_types()
        .into_iter()
        .map(|(category, types)| {
            let types: Vec<_> = types.into_iter().filter(|def| keep(def)).collect();
            (category, types)
        })
        .filter(|(_, types)| !types.is_empty())
        .collect();

    if let OutputFormat::Json = args.format {
        let types: Vec<&FieldTypeDefinition> =
            groups.iter().flat_map(|(_, types)| types.iter()).collect();
        let json = serde_json::to_string_pretty(&types).context("Failed to serialize field types")?;
        println!("{}", json);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No field types match.");
        return Ok(());
    }

    for (category, types) in &groups {
        println!("{} {}", category.name.bold(), format!("({})", category.id).dimmed());
        for def in types {
            println!(
                "  {:<14} {:<16} {}",
                def.field_type.to_string().cyan(),
                def.display_name,
                def.description.dimmed()
            );
        }
        println!();
    }
    let total: usize = groups.iter().map(|(_, types)| types.len()).sum();
    println!("{} field types", total);
    Ok(())
}
