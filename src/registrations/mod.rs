//! Registration of the built-in categories, field types and rules

pub mod categories;
pub mod fields;
pub mod rules;

use crate::engine::FormEngine;
use anyhow::Result;

/// Register everything the standard engine ships with
pub fn register_all(engine: &FormEngine) -> Result<()> {
    categories::register(engine.categories());
    rules::register(engine.rules())?;
    fields::register(engine.field_types())?;
    Ok(())
}
