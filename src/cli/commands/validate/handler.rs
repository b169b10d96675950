//! Validate submitted values against a form definition

use super::super::{OutputFormat, read_json};
use super::ValidateCommands;
use formcraft::engine::FormEngine;
use formcraft::model::FormConfig;
use anyhow::{Context, Result};
use colored::*;
use serde_json::{Map, Value};

pub fn handle_validate_command(engine: &FormEngine, args: ValidateCommands) -> Result<()> {
    let form: FormConfig = read_json(&args.form)?;
    if let Err(e) = form.check_integrity() {
        log::warn!("Form {} is inconsistent: {}", form.id, e);
        println!("{} {}", "⚠".yellow(), e);
    }

    let values: Map<String, Value> = read_json(&args.values)?;
    let mut runtime = engine.runtime(form);

    let report = match &args.page {
        Some(page) => {
            runtime.enter_page(page)?;
            runtime.validate_page(&values)?
        }
        None => runtime.validate_all(&values)?,
    };

    if let OutputFormat::Json = args.format {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else if report.is_empty() {
        println!("{} all fields valid", "✓".green());
    } else {
        for (field_id, failures) in &report {
            let label = runtime
                .form()
                .field(field_id)
                .map(|f| f.label.clone())
                .unwrap_or_else(|| field_id.clone());
            println!("{} {}", "✗".red(), label.bold());
            for failure in failures {
                println!("    {} {}", failure.key.dimmed(), failure.message);
            }
        }
    }

    if !report.is_empty() {
        anyhow::bail!("{} field(s) failed validation", report.len());
    }
    Ok(())
}
