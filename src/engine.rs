//! The registries bundled together and handed to builder and runtime

use crate::config::EngineConfig;
use crate::editor::FormEditor;
use crate::model::{FieldType, FormConfig};
use crate::registrations;
use crate::registry::{CategoryCatalog, FieldCategory, FieldTypeDefinition, FieldTypeRegistry};
use crate::runtime::FormRuntime;
use crate::validation::{ValidationComposer, ValidationRuleRegistry};
use anyhow::Result;
use std::sync::Arc;

/// Category catalog, field type registry and rule registry
///
/// Cloning is cheap and shares the registries.
#[derive(Clone)]
pub struct FormEngine {
    categories: Arc<CategoryCatalog>,
    field_types: Arc<FieldTypeRegistry>,
    rules: Arc<ValidationRuleRegistry>,
    fallback_type: FieldType,
}

impl FormEngine {
    /// Engine with empty registries
    pub fn new() -> Self {
        let field_types = Arc::new(FieldTypeRegistry::new());
        let rules = Arc::new(ValidationRuleRegistry::new(field_types.clone()));
        Self {
            categories: Arc::new(CategoryCatalog::new()),
            field_types,
            rules,
            fallback_type: FieldType::Text,
        }
    }

    /// Engine with the built-in categories, field types and rules
    pub fn standard() -> Result<Self> {
        let engine = Self::new();
        registrations::register_all(&engine)?;
        Ok(engine)
    }

    /// Standard engine set up from configuration
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::standard()?.with_fallback_type(config.fallback_type.clone()))
    }

    /// Field type whose rules apply to types without rules of their own
    pub fn with_fallback_type(mut self, fallback: FieldType) -> Self {
        self.fallback_type = fallback;
        self
    }

    pub fn categories(&self) -> &Arc<CategoryCatalog> {
        &self.categories
    }

    pub fn field_types(&self) -> &Arc<FieldTypeRegistry> {
        &self.field_types
    }

    pub fn rules(&self) -> &Arc<ValidationRuleRegistry> {
        &self.rules
    }

    pub fn composer(&self) -> ValidationComposer {
        ValidationComposer::new(self.rules.clone()).with_fallback(self.fallback_type.clone())
    }

    /// Builder session over a form
    pub fn editor(&self, form: FormConfig, config: &EngineConfig) -> FormEditor {
        FormEditor::new(form, self.field_types.clone(), config.debounce())
    }

    /// Filling session over a form
    pub fn runtime(&self, form: FormConfig) -> FormRuntime {
        FormRuntime::new(form, self.composer())
    }

    /// Field types grouped under their categories, in category order
    ///
    /// Types whose category is not in the catalog are grouped last under a
    /// placeholder category named after the id.
    pub fn grouped_field_types(&self) -> Vec<(FieldCategory, Vec<FieldTypeDefinition>)> {
        let mut groups: Vec<(FieldCategory, Vec<FieldTypeDefinition>)> = self
            .categories
            .all()
            .into_iter()
            .map(|category| {
                let types = self.field_types.get_by_category(&category.id);
                (category, types)
            })
            .filter(|(_, types)| !types.is_empty())
            .collect();

        let mut orphans: Vec<FieldTypeDefinition> = self
            .field_types
            .get_all()
            .into_iter()
            .filter(|def| !self.categories.contains(&def.category))
            .collect();
        orphans.sort_by(|a, b| a.category.cmp(&b.category));
        for def in orphans {
            match groups.last_mut() {
                Some((category, types)) if category.id == def.category => types.push(def),
                _ => {
                    let category = FieldCategory::new(&def.category, &def.category, "", u32::MAX);
                    groups.push((category, vec![def]));
                }
            }
        }
        groups
    }
}

impl Default for FormEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FieldTypeDefBuilder;

    #[test]
    fn test_standard_engine_is_populated() {
        let engine = FormEngine::standard().unwrap();
        assert_eq!(engine.categories().count(), 4);
        assert_eq!(engine.field_types().count(), FieldType::builtin().len());
        assert!(engine.rules().contains("required"));
        assert!(!engine.rules().rules_for(&FieldType::Email).is_empty());
    }

    #[test]
    fn test_engines_are_isolated() {
        let a = FormEngine::standard().unwrap();
        let b = FormEngine::new();
        assert!(a.field_types().is_registered(&FieldType::Text));
        assert!(!b.field_types().is_registered(&FieldType::Text));
    }

    #[test]
    fn test_grouped_field_types() {
        let engine = FormEngine::standard().unwrap();
        engine.field_types().register(
            FieldTypeDefBuilder::new(FieldType::custom("signature"))
                .display_name("Signature")
                .category("plugins")
                .build()
                .unwrap(),
        );

        let groups = engine.grouped_field_types();
        let ids: Vec<_> = groups.iter().map(|(c, _)| c.id.as_str()).collect();
        assert_eq!(ids, vec!["basic", "choice", "datetime", "advanced", "plugins"]);

        let total: usize = groups.iter().map(|(_, types)| types.len()).sum();
        assert_eq!(total, engine.field_types().count());
    }
}
