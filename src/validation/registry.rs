//! Registry of validation rules and their applicability per field type

use super::rule::ValidationRuleDefinition;
use crate::model::FieldType;
use crate::registry::FieldTypeRegistry;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Default)]
struct RuleStore {
    /// Keys in first-registration order
    order: Vec<String>,
    rules: HashMap<String, ValidationRuleDefinition>,
}

/// Validation rules keyed by rule key
///
/// Field types either enumerate their rule keys on their registry
/// definition or get a mapping through [`register_field_rule_keys`].
///
/// [`register_field_rule_keys`]: ValidationRuleRegistry::register_field_rule_keys
pub struct ValidationRuleRegistry {
    store: RwLock<RuleStore>,
    field_rule_keys: RwLock<HashMap<FieldType, Vec<String>>>,
    field_types: Arc<FieldTypeRegistry>,
}

impl ValidationRuleRegistry {
    pub fn new(field_types: Arc<FieldTypeRegistry>) -> Self {
        Self {
            store: RwLock::new(RuleStore::default()),
            field_rule_keys: RwLock::new(HashMap::new()),
            field_types,
        }
    }

    /// Insert or replace a rule; a replaced rule keeps its position
    pub fn register_rule(&self, rule: ValidationRuleDefinition) {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        if !store.rules.contains_key(&rule.key) {
            store.order.push(rule.key.clone());
        } else {
            log::debug!("Replacing validation rule {}", rule.key);
        }
        log::debug!("Registered validation rule: {} ({:?})", rule.key, rule.kind);
        store.rules.insert(rule.key.clone(), rule);
    }

    /// Declare the rule keys applicable to a field type
    pub fn register_field_rule_keys<S: AsRef<str>>(&self, field_type: FieldType, keys: &[S]) {
        let keys: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
        log::debug!("Mapped {} rule keys to field type {}", keys.len(), field_type);
        self.field_rule_keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(field_type, keys);
    }

    pub fn get(&self, key: &str) -> Option<ValidationRuleDefinition> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .rules
            .get(key)
            .cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .rules
            .contains_key(key)
    }

    /// All rules in registration order
    pub fn all(&self) -> Vec<ValidationRuleDefinition> {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store
            .order
            .iter()
            .filter_map(|key| store.rules.get(key).cloned())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .rules
            .len()
    }

    /// Rule keys applicable to a field type
    ///
    /// The field type definition's own list wins; the explicit mapping is
    /// the fallback.
    pub fn keys_for(&self, field_type: &FieldType) -> Vec<String> {
        if let Some(def) = self.field_types.get(field_type) {
            if !def.validation_rule_keys.is_empty() {
                return def.validation_rule_keys;
            }
        }
        self.field_rule_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(field_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Rules applicable to a field type, in the order of its key list
    ///
    /// Keys without a registered rule are skipped.
    pub fn rules_for(&self, field_type: &FieldType) -> Vec<ValidationRuleDefinition> {
        let keys = self.keys_for(field_type);
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        keys.iter()
            .filter_map(|key| {
                let rule = store.rules.get(key).cloned();
                if rule.is_none() {
                    log::debug!("Field type {} lists unregistered rule {}", field_type, key);
                }
                rule
            })
            .collect()
    }

    /// A rule, only if it applies to the field type
    pub fn rule_for(&self, field_type: &FieldType, key: &str) -> Option<ValidationRuleDefinition> {
        if !self.keys_for(field_type).iter().any(|k| k == key) {
            return None;
        }
        self.get(key)
    }

    /// Keys of the set that are mutually exclusive with another key of the set
    ///
    /// A conflict declared by either side counts. Input order is kept.
    pub fn conflicts_among<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        let declares = |a: &str, b: &str| {
            store
                .rules
                .get(a)
                .is_some_and(|rule| rule.conflicts_with(b))
        };

        let mut conflicting = Vec::new();
        for (i, a) in keys.iter().enumerate() {
            let a = a.as_ref();
            if conflicting.iter().any(|k: &String| k == a) {
                continue;
            }
            let clashes = keys.iter().enumerate().any(|(j, b)| {
                let b = b.as_ref();
                i != j && a != b && (declares(a, b) || declares(b, a))
            });
            if clashes {
                conflicting.push(a.to_string());
            }
        }
        conflicting
    }

    /// Every rule key required by the given keys, transitively
    ///
    /// Keys already in the input are left out; first-seen order.
    pub fn dependencies_of<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        let enabled: HashSet<&str> = keys.iter().map(|k| k.as_ref()).collect();

        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
        let mut required = Vec::new();

        while let Some(key) = queue.pop_front() {
            let Some(rule) = store.rules.get(&key) else {
                continue;
            };
            for dep in &rule.dependencies {
                if seen.insert(dep.clone()) {
                    if !enabled.contains(dep.as_str()) {
                        required.push(dep.clone());
                    }
                    queue.push_back(dep.clone());
                }
            }
        }
        required
    }

    /// Dependencies the builder must enable before `key` can be turned on
    ///
    /// Only `key`'s own dependency chain counts; whatever the enabled rules
    /// need themselves is not reported.
    pub fn missing_dependencies<S: AsRef<str>>(&self, key: &str, enabled: &[S]) -> Vec<String> {
        self.dependencies_of(&[key])
            .into_iter()
            .filter(|dep| !enabled.iter().any(|k| k.as_ref() == dep))
            .collect()
    }
}
