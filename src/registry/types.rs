//! Core types for the field type registry

use crate::model::{FieldEntity, FieldOption, FieldType, FieldWidth};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Initial configuration applied to a newly added field of a type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<FieldWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_multi_select: Option<bool>,
}

impl FieldDefaults {
    /// Fill a field with these defaults; label is only used when the field has none
    pub fn apply(&self, field: &mut FieldEntity) {
        if field.label.is_empty() {
            if let Some(label) = &self.label {
                field.label = label.clone();
            }
        }
        if field.placeholder.is_none() {
            field.placeholder = self.placeholder.clone();
        }
        if field.helper_text.is_none() {
            field.helper_text = self.helper_text.clone();
        }
        if field.default_value.is_none() {
            field.default_value = self.default_value.clone();
        }
        if field.options.is_none() {
            field.options = self.options.clone();
        }
        if let Some(width) = self.width {
            field.width = width;
        }
        if field.allow_multi_select.is_none() {
            field.allow_multi_select = self.allow_multi_select;
        }
    }
}

/// Input control the builder shows for a customization knob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "camelCase")]
pub enum CustomizationInput {
    Text,
    Textarea,
    Number,
    Toggle,
    Select { options: Vec<String> },
    OptionsList,
}

/// One configurable knob of a field type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationOption {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub input: CustomizationInput,
}

impl CustomizationOption {
    pub fn new(key: &str, label: &str, input: CustomizationInput) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            input,
        }
    }
}

/// Reference to the UI component that renders a field type
///
/// Opaque to this crate; carried so the rendering layer can look it up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub props: Value,
}

impl ComponentDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            props: Value::Null,
        }
    }
}

/// Complete definition of a field type including metadata for the builder UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTypeDefinition {
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Human-readable name (e.g., "Short Text")
    pub display_name: String,

    pub description: String,

    /// Id of the `FieldCategory` this type is listed under
    pub category: String,

    /// Icon reference resolved by the UI layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Extra search keywords
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub default_config: FieldDefaults,

    /// Rule keys relevant for this type, in presentation order
    #[serde(default)]
    pub validation_rule_keys: Vec<String>,

    #[serde(default)]
    pub customization_schema: Vec<CustomizationOption>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentDescriptor>,
}

impl FieldTypeDefinition {
    /// Case-insensitive substring match over name, description and tags
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.display_name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
    }
}

/// Options for registering a field type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    /// Replace an existing definition of the same type
    pub override_existing: bool,
}

impl RegisterOptions {
    pub fn overriding() -> Self {
        Self {
            override_existing: true,
        }
    }
}

/// Result of a registration attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Inserted,
    Replaced,
    /// A definition already existed and was kept
    Rejected,
}

impl RegisterOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, RegisterOutcome::Rejected)
    }
}

/// Change broadcast to registry listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Registered(FieldType),
    Replaced(FieldType),
    Unregistered(FieldType),
}

impl RegistryEvent {
    pub fn field_type(&self) -> &FieldType {
        match self {
            RegistryEvent::Registered(ty)
            | RegistryEvent::Replaced(ty)
            | RegistryEvent::Unregistered(ty) => ty,
        }
    }
}
