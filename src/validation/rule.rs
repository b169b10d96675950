//! Validation rule definitions

use crate::model::FieldEntity;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Checks one field value against a configured rule value
///
/// Arguments are the configured value, the candidate field value and the
/// field itself. `Err` carries a detail message describing the failure.
pub type RuleValidator =
    Arc<dyn Fn(&Value, &Value, &FieldEntity) -> std::result::Result<(), String> + Send + Sync>;

/// How a rule is parameterized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Binary,
    WithValue,
    /// Needs more than a single value
    ///
    /// The kind is metadata for the builder. Composition follows the stored
    /// config kind: `binary` or `withValue` configs still run the validator,
    /// while a `complex` config compiles to a check that always passes.
    Complex,
}

/// Grouping used by the builder's rule picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleCategory {
    Basic,
    Advanced,
    Custom,
}

/// A registered validation rule
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRuleDefinition {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: RuleKind,
    pub category: RuleCategory,
    pub default_value: Value,
    pub default_message: String,
    /// Rule keys that must also be enabled
    pub dependencies: Vec<String>,
    /// Rule keys that must not be enabled at the same time
    pub conflicts: Vec<String>,
    #[serde(skip)]
    pub validator: RuleValidator,
}

impl ValidationRuleDefinition {
    /// Run the validator directly
    pub fn validate(
        &self,
        configured: &Value,
        value: &Value,
        field: &FieldEntity,
    ) -> std::result::Result<(), String> {
        (self.validator)(configured, value, field)
    }

    pub fn conflicts_with(&self, key: &str) -> bool {
        self.conflicts.iter().any(|k| k == key)
    }
}

impl fmt::Debug for ValidationRuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRuleDefinition")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("category", &self.category)
            .field("dependencies", &self.dependencies)
            .field("conflicts", &self.conflicts)
            .finish_non_exhaustive()
    }
}

/// Builder for validation rule definitions
pub struct RuleDefBuilder {
    key: String,
    label: Option<String>,
    description: Option<String>,
    kind: RuleKind,
    category: RuleCategory,
    default_value: Value,
    default_message: Option<String>,
    dependencies: Vec<String>,
    conflicts: Vec<String>,
    validator: Option<RuleValidator>,
}

impl RuleDefBuilder {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            label: None,
            description: None,
            kind: RuleKind::Binary,
            category: RuleCategory::Basic,
            default_value: Value::Bool(true),
            default_message: None,
            dependencies: Vec::new(),
            conflicts: Vec::new(),
            validator: None,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// On/off rule
    pub fn binary(mut self) -> Self {
        self.kind = RuleKind::Binary;
        self.default_value = Value::Bool(true);
        self
    }

    /// Rule parameterized by a value
    pub fn with_value(mut self, default: impl Into<Value>) -> Self {
        self.kind = RuleKind::WithValue;
        self.default_value = default.into();
        self
    }

    pub fn complex(mut self) -> Self {
        self.kind = RuleKind::Complex;
        self.default_value = Value::Null;
        self
    }

    pub fn category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.default_message = Some(message.to_string());
        self
    }

    pub fn depends_on(mut self, keys: &[&str]) -> Self {
        self.dependencies.extend(keys.iter().map(|k| k.to_string()));
        self
    }

    pub fn conflicts_with(mut self, keys: &[&str]) -> Self {
        self.conflicts.extend(keys.iter().map(|k| k.to_string()));
        self
    }

    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value, &Value, &FieldEntity) -> std::result::Result<(), String>
            + Send
            + Sync
            + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn build(self) -> Result<ValidationRuleDefinition> {
        let validator = self
            .validator
            .ok_or_else(|| anyhow::anyhow!("validator is required for rule '{}'", self.key))?;
        let label = self.label.unwrap_or_else(|| self.key.clone());
        let default_message = self
            .default_message
            .unwrap_or_else(|| format!("{} is not satisfied", label));

        Ok(ValidationRuleDefinition {
            key: self.key,
            label,
            description: self.description,
            kind: self.kind,
            category: self.category,
            default_value: self.default_value,
            default_message,
            dependencies: self.dependencies,
            conflicts: self.conflicts,
            validator,
        })
    }
}
