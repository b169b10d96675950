//! Built-in validation rules

use crate::validation::{ValidationRuleRegistry, builtin};
use anyhow::Result;

pub fn register(registry: &ValidationRuleRegistry) -> Result<()> {
    for rule in builtin::standard_rules()? {
        registry.register_rule(rule);
    }

    log::info!("Registered {} validation rules", registry.count());
    Ok(())
}
