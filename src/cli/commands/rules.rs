use super::OutputFormat;
use formcraft::engine::FormEngine;
use formcraft::model::FieldType;
use formcraft::validation::{RuleKind, ValidationRuleDefinition};
use anyhow::{Context, Result};
use clap::Args;
use colored::*;

#[derive(Args)]
pub struct RulesCommands {
    /// Field type tag (e.g. text, dropdown, or a plugin type)
    pub field_type: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct CheckRulesCommands {
    /// Field type tag
    pub field_type: String,

    /// Rule keys that would be enabled together
    #[arg(required = true)]
    pub keys: Vec<String>,
}

pub fn handle_rules_command(engine: &FormEngine, args: RulesCommands) -> Result<()> {
    let field_type = FieldType::from(args.field_type.as_str());
    if !engine.field_types().is_registered(&field_type) {
        log::warn!("Field type '{}' is not registered", field_type);
    }
    let rules = engine.rules().rules_for(&field_type);

    if let OutputFormat::Json = args.format {
        let json = serde_json::to_string_pretty(&rules).context("Failed to serialize rules")?;
        println!("{}", json);
        return Ok(());
    }

    if rules.is_empty() {
        println!("No rules apply to '{}'.", field_type);
        println!("Fields of this type are validated with the fallback type's rules.");
        return Ok(());
    }

    println!("Validation rules for {}", field_type.to_string().bold());
    for rule in &rules {
        print_rule(rule);
    }
    Ok(())
}

fn print_rule(rule: &ValidationRuleDefinition) {
    let kind = match rule.kind {
        RuleKind::Binary => "binary".to_string(),
        RuleKind::WithValue => format!("value, default {}", rule.default_value),
        RuleKind::Complex => "complex".to_string(),
    };
    println!("  {:<14} {} {}", rule.key.cyan(), rule.label, format!("[{}]", kind).dimmed());
    println!("  {:<14} {}", "", rule.default_message.dimmed());
    if !rule.dependencies.is_empty() {
        println!("  {:<14} requires {}", "", rule.dependencies.join(", ").yellow());
    }
    if !rule.conflicts.is_empty() {
        println!("  {:<14} conflicts with {}", "", rule.conflicts.join(", ").yellow());
    }
}

pub fn handle_check_rules_command(engine: &FormEngine, args: CheckRulesCommands) -> Result<()> {
    let field_type = FieldType::from(args.field_type.as_str());
    let rules = engine.rules();
    let mut problems = 0;

    for key in &args.keys {
        if !rules.contains(key) {
            println!("{} unknown rule '{}'", "✗".red(), key);
            problems += 1;
        } else if rules.rule_for(&field_type, key).is_none() {
            println!("{} '{}' does not apply to {}", "✗".red(), key, field_type);
            problems += 1;
        }
    }

    let conflicts = rules.conflicts_among(args.keys.as_slice());
    if !conflicts.is_empty() {
        println!("{} conflicting rules: {}", "✗".red(), conflicts.join(", "));
        problems += 1;
    }

    let missing = rules.dependencies_of(args.keys.as_slice());
    for dep in &missing {
        println!("{} enable '{}' first", "✗".red(), dep);
        problems += 1;
    }

    if problems > 0 {
        anyhow::bail!("{} problem(s) with the rule selection", problems);
    }
    println!("{} rule selection is valid for {}", "✓".green(), field_type);
    Ok(())
}
