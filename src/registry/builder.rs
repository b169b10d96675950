//! Fluent builder API for creating field type definitions

use super::types::{
    ComponentDescriptor, CustomizationInput, CustomizationOption, FieldDefaults,
    FieldTypeDefinition,
};
use crate::model::{FieldOption, FieldType, FieldWidth};
use anyhow::Result;
use serde_json::Value;

/// Builder for creating field type definitions with a fluent API
pub struct FieldTypeDefBuilder {
    field_type: FieldType,
    display_name: Option<String>,
    description: Option<String>,
    category: Option<String>,
    icon: Option<String>,
    tags: Vec<String>,
    defaults: FieldDefaults,
    rule_keys: Vec<String>,
    customization: Vec<CustomizationOption>,
    component: Option<ComponentDescriptor>,
}

impl FieldTypeDefBuilder {
    /// Create a new builder for a field type
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            display_name: None,
            description: None,
            category: None,
            icon: None,
            tags: Vec::new(),
            defaults: FieldDefaults::default(),
            rule_keys: Vec::new(),
            customization: Vec::new(),
            component: None,
        }
    }

    /// Set the display name (human-readable label)
    pub fn display_name(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    /// Set the description (help text)
    pub fn description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Set the category id the type is listed under
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// Add search keywords
    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().map(|t| t.to_string()));
        self
    }

    /// Label given to new fields of this type
    pub fn default_label(mut self, label: &str) -> Self {
        self.defaults.label = Some(label.to_string());
        self
    }

    pub fn default_placeholder(mut self, placeholder: &str) -> Self {
        self.defaults.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.defaults.default_value = Some(value.into());
        self
    }

    /// Options given to new fields, as (label, value) pairs
    pub fn default_options(mut self, options: &[(&str, &str)]) -> Self {
        self.defaults.options = Some(
            options
                .iter()
                .map(|(label, value)| FieldOption::new(*label, *value))
                .collect(),
        );
        self
    }

    pub fn default_width(mut self, width: FieldWidth) -> Self {
        self.defaults.width = Some(width);
        self
    }

    pub fn multi_select(mut self, allow: bool) -> Self {
        self.defaults.allow_multi_select = Some(allow);
        self
    }

    /// Rule keys applicable to this type, in presentation order
    pub fn rules(mut self, keys: &[&str]) -> Self {
        self.rule_keys.extend(keys.iter().map(|k| k.to_string()));
        self
    }

    /// Add a knob to the customization schema
    pub fn customize(mut self, key: &str, label: &str, input: CustomizationInput) -> Self {
        self.customization
            .push(CustomizationOption::new(key, label, input));
        self
    }

    pub fn component(mut self, component: ComponentDescriptor) -> Self {
        self.component = Some(component);
        self
    }

    /// Build the field type definition
    ///
    /// Returns an error if required fields are missing
    pub fn build(self) -> Result<FieldTypeDefinition> {
        let display_name = self
            .display_name
            .ok_or_else(|| anyhow::anyhow!("display_name is required for '{}'", self.field_type))?;
        let category = self
            .category
            .ok_or_else(|| anyhow::anyhow!("category is required for '{}'", self.field_type))?;

        Ok(FieldTypeDefinition {
            field_type: self.field_type,
            display_name,
            description: self.description.unwrap_or_default(),
            category,
            icon: self.icon,
            tags: self.tags,
            default_config: self.defaults,
            validation_rule_keys: self.rule_keys,
            customization_schema: self.customization,
            component: self.component,
        })
    }
}
