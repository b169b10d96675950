//! Compiles a field's declarative rule configuration into executable checks
//!
//! Composition never fails: a rule that cannot be resolved, or that is
//! configured with an unsupported kind, becomes a check that always passes,
//! so a stale or broken configuration cannot block a form.

use super::builtin;
use super::registry::ValidationRuleRegistry;
use super::rule::{RuleValidator, ValidationRuleDefinition};
use crate::model::{ConfigKind, FieldEntity, FieldType, RuleConfig};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Predicate over a candidate field value
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Where a compiled validator came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidatorOrigin {
    /// Imposed by the renderer (e.g. structural required-ness)
    Structural,
    /// Compiled from `validation.custom`
    Custom,
}

/// One executable check plus the message shown when it fails
#[derive(Clone)]
pub struct CompiledValidator {
    pub key: String,
    pub message: String,
    pub origin: ValidatorOrigin,
    predicate: Predicate,
}

impl CompiledValidator {
    pub fn new(key: &str, message: &str, origin: ValidatorOrigin, predicate: Predicate) -> Self {
        Self {
            key: key.to_string(),
            message: message.to_string(),
            origin,
            predicate,
        }
    }

    /// A check that accepts every value
    pub fn always_pass(key: &str, origin: ValidatorOrigin) -> Self {
        Self::new(key, "", origin, Arc::new(|_| true))
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if self.check(value) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

impl fmt::Debug for CompiledValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledValidator")
            .field("key", &self.key)
            .field("message", &self.message)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// A failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub key: String,
    pub message: String,
}

/// The runtime validation map of one field
///
/// Structural and custom entries are kept apart so recomposition can
/// replace the custom ones without touching the rest. On a key collision
/// the custom entry shadows the structural one.
#[derive(Debug, Clone, Default)]
pub struct ValidatorSet {
    structural: BTreeMap<String, CompiledValidator>,
    custom: BTreeMap<String, CompiledValidator>,
}

impl ValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set seeded with the renderer's own checks for a field
    pub fn structural_for(field: &FieldEntity) -> Self {
        let mut set = Self::new();
        if field.required {
            set.insert_structural(CompiledValidator::new(
                "required",
                "This field is required",
                ValidatorOrigin::Structural,
                Arc::new(|value| !builtin::is_empty(value)),
            ));
        }
        set
    }

    pub fn insert_structural(&mut self, validator: CompiledValidator) {
        let validator = CompiledValidator {
            origin: ValidatorOrigin::Structural,
            ..validator
        };
        self.structural.insert(validator.key.clone(), validator);
    }

    fn replace_custom(&mut self, custom: BTreeMap<String, CompiledValidator>) {
        self.custom = custom;
    }

    /// Effective validator for a key
    pub fn get(&self, key: &str) -> Option<&CompiledValidator> {
        self.custom.get(key).or_else(|| self.structural.get(key))
    }

    /// Effective validators in key order
    pub fn iter(&self) -> impl Iterator<Item = &CompiledValidator> {
        let shadowed = self
            .structural
            .iter()
            .filter(|(key, _)| !self.custom.contains_key(*key))
            .map(|(_, v)| v);
        let mut all: Vec<&CompiledValidator> = shadowed.chain(self.custom.values()).collect();
        all.sort_by(|a, b| a.key.cmp(&b.key));
        all.into_iter()
    }

    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|v| v.key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.structural.is_empty() && self.custom.is_empty()
    }

    /// Run every check against a value
    pub fn validate(&self, value: &Value) -> Vec<ValidationFailure> {
        self.iter()
            .filter_map(|validator| {
                validator.validate(value).err().map(|message| ValidationFailure {
                    key: validator.key.clone(),
                    message,
                })
            })
            .collect()
    }

    pub fn check_all(&self, value: &Value) -> bool {
        self.iter().all(|validator| validator.check(value))
    }
}

/// Turns `validation.custom` maps into [`ValidatorSet`]s
#[derive(Clone)]
pub struct ValidationComposer {
    rules: Arc<ValidationRuleRegistry>,
    fallback: FieldType,
}

impl ValidationComposer {
    pub fn new(rules: Arc<ValidationRuleRegistry>) -> Self {
        Self {
            rules,
            fallback: FieldType::Text,
        }
    }

    /// Rule set used for field types that have no rules of their own
    pub fn with_fallback(mut self, fallback: FieldType) -> Self {
        self.fallback = fallback;
        self
    }

    /// Compose a fresh set: structural checks plus the field's custom rules
    pub fn compose(&self, field: &FieldEntity) -> ValidatorSet {
        let mut set = ValidatorSet::structural_for(field);
        self.compose_into(field, &mut set);
        set
    }

    /// Replace the custom entries of `set` with the field's current configuration
    ///
    /// Structural entries already in `set` are kept.
    pub fn compose_into(&self, field: &FieldEntity, set: &mut ValidatorSet) {
        let field = Arc::new(field.clone());
        let custom = field
            .validation
            .custom
            .iter()
            .map(|(key, config)| (key.clone(), self.compile(&field, key, config)))
            .collect();
        set.replace_custom(custom);
    }

    /// The rule definition a key resolves to for a field type
    fn resolve(&self, field_type: &FieldType, key: &str) -> Option<ValidationRuleDefinition> {
        let scope = if self.rules.rules_for(field_type).is_empty() {
            &self.fallback
        } else {
            field_type
        };
        self.rules.rule_for(scope, key)
    }

    fn compile(&self, field: &Arc<FieldEntity>, key: &str, config: &RuleConfig) -> CompiledValidator {
        let Some(rule) = self.resolve(&field.field_type, key) else {
            log::debug!(
                "Rule '{}' does not resolve for field {} ({}); skipping",
                key,
                field.id,
                field.field_type
            );
            return CompiledValidator::always_pass(key, ValidatorOrigin::Custom);
        };

        let message = render_message(
            if config.message.trim().is_empty() {
                &rule.default_message
            } else {
                &config.message
            },
            &config.value,
        );

        let configured = match &config.kind {
            ConfigKind::Binary => rule.default_value.clone(),
            ConfigKind::WithValue => config.value.clone(),
            ConfigKind::Unsupported(kind) => {
                log::debug!("Rule '{}' on field {} has unsupported kind '{}'", key, field.id, kind);
                return CompiledValidator::always_pass(key, ValidatorOrigin::Custom);
            }
        };

        CompiledValidator::new(
            key,
            &message,
            ValidatorOrigin::Custom,
            bind(rule.validator, configured, field.clone()),
        )
    }
}

/// Fix the configured value and field so only the candidate value varies
fn bind(validator: RuleValidator, configured: Value, field: Arc<FieldEntity>) -> Predicate {
    Arc::new(move |value| validator(&configured, value, &field).is_ok())
}

/// Substitute `{value}` with the configured value
fn render_message(template: &str, value: &Value) -> String {
    if !template.contains("{value}") {
        return template.to_string();
    }
    let shown = match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(String::from).unwrap_or_else(|| item.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };
    template.replace("{value}", &shown)
}
