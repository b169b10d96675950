//! Registry of field type definitions

use super::types::{
    ComponentDescriptor, FieldTypeDefinition, RegisterOptions, RegisterOutcome, RegistryEvent,
};
use crate::model::FieldType;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Callback invoked after every registry mutation
pub type Listener = Arc<dyn Fn(&RegistryEvent) + Send + Sync>;

/// Handle returned by [`FieldTypeRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Field type definitions keyed by type, with change notification
///
/// Both registration entry points share one overwrite policy: an existing
/// definition is kept unless the caller asks to override it.
pub struct FieldTypeRegistry {
    definitions: RwLock<HashMap<FieldType, FieldTypeDefinition>>,
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
}

impl FieldTypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            definitions: RwLock::new(HashMap::new()),
            listeners: RwLock::new(Vec::new()),
            next_listener: AtomicU64::new(1),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<FieldType, FieldTypeDefinition>> {
        self.definitions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<FieldType, FieldTypeDefinition>> {
        self.definitions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a field type definition, keeping any existing one
    pub fn register(&self, def: FieldTypeDefinition) -> RegisterOutcome {
        self.register_with(def, RegisterOptions::default())
    }

    /// Register a field type definition with explicit options
    pub fn register_with(&self, def: FieldTypeDefinition, options: RegisterOptions) -> RegisterOutcome {
        let field_type = def.field_type.clone();
        let outcome = match self.write().entry(field_type.clone()) {
            Entry::Occupied(mut existing) if options.override_existing => {
                log::debug!("Replaced field type: {} ({})", field_type, def.display_name);
                existing.insert(def);
                RegisterOutcome::Replaced
            }
            Entry::Occupied(_) => {
                log::warn!(
                    "Field type '{}' is already registered; keeping the existing definition",
                    field_type
                );
                RegisterOutcome::Rejected
            }
            Entry::Vacant(slot) => {
                log::debug!("Registered field type: {} ({})", field_type, def.display_name);
                slot.insert(def);
                RegisterOutcome::Inserted
            }
        };

        match outcome {
            RegisterOutcome::Inserted => self.notify(RegistryEvent::Registered(field_type)),
            RegisterOutcome::Replaced => self.notify(RegistryEvent::Replaced(field_type)),
            RegisterOutcome::Rejected => {}
        }
        outcome
    }

    /// Register a definition together with the component that renders it
    ///
    /// `field_type` wins over the type carried by `def`.
    pub fn register_with_component(
        &self,
        field_type: FieldType,
        mut def: FieldTypeDefinition,
        component: ComponentDescriptor,
        options: RegisterOptions,
    ) -> RegisterOutcome {
        def.field_type = field_type;
        def.component = Some(component);
        self.register_with(def, options)
    }

    /// Remove a field type, returning its definition
    pub fn unregister(&self, field_type: &FieldType) -> Option<FieldTypeDefinition> {
        let removed = self.write().remove(field_type);
        if removed.is_some() {
            log::debug!("Unregistered field type: {}", field_type);
            self.notify(RegistryEvent::Unregistered(field_type.clone()));
        }
        removed
    }

    /// Get a definition by type
    pub fn get(&self, field_type: &FieldType) -> Option<FieldTypeDefinition> {
        self.read().get(field_type).cloned()
    }

    pub fn is_registered(&self, field_type: &FieldType) -> bool {
        self.read().contains_key(field_type)
    }

    /// All definitions, sorted by display name
    pub fn get_all(&self) -> Vec<FieldTypeDefinition> {
        let mut all: Vec<_> = self.read().values().cloned().collect();
        sort_for_display(&mut all);
        all
    }

    /// Definitions listed under a category
    pub fn get_by_category(&self, category: &str) -> Vec<FieldTypeDefinition> {
        let mut defs: Vec<_> = self
            .read()
            .values()
            .filter(|def| def.category == category)
            .cloned()
            .collect();
        sort_for_display(&mut defs);
        defs
    }

    /// Case-insensitive substring search over name, description and tags
    pub fn search(&self, query: &str) -> Vec<FieldTypeDefinition> {
        let query = query.trim();
        let mut hits: Vec<_> = self
            .read()
            .values()
            .filter(|def| query.is_empty() || def.matches_query(query))
            .cloned()
            .collect();
        sort_for_display(&mut hits);
        hits
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Subscribe to registry changes
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&RegistryEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not subscribed
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Broadcast to a snapshot of the listeners, outside any lock
    fn notify(&self, event: RegistryEvent) {
        let listeners: Vec<(ListenerId, Listener)> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for (id, listener) in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(&event))).is_err() {
                log::warn!("Registry listener {:?} panicked handling {:?}", id, event);
            }
        }
    }
}

impl Default for FieldTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_for_display(defs: &mut [FieldTypeDefinition]) {
    defs.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.field_type.cmp(&b.field_type))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FieldTypeDefBuilder;
    use std::sync::Mutex;

    fn custom_def(tag: &str, display_name: &str) -> FieldTypeDefinition {
        FieldTypeDefBuilder::new(FieldType::custom(tag))
            .display_name(display_name)
            .description("A plugin field")
            .category("advanced")
            .tags(&["plugin"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let registry = FieldTypeRegistry::new();
        let outcome = registry.register(custom_def("rating", "Star Rating"));

        assert_eq!(outcome, RegisterOutcome::Inserted);
        let retrieved = registry.get(&FieldType::custom("rating")).unwrap();
        assert_eq!(retrieved.display_name, "Star Rating");
        assert!(registry.get(&FieldType::Text).is_none());
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let registry = FieldTypeRegistry::new();
        registry.register(custom_def("custom1", "First"));
        let outcome = registry.register_with_component(
            FieldType::custom("custom1"),
            custom_def("custom1", "Second"),
            ComponentDescriptor::new("SecondComponent"),
            RegisterOptions::default(),
        );

        assert_eq!(outcome, RegisterOutcome::Rejected);
        let def = registry.get(&FieldType::custom("custom1")).unwrap();
        assert_eq!(def.display_name, "First");
        assert!(def.component.is_none());
    }

    #[test]
    fn test_override_replaces() {
        let registry = FieldTypeRegistry::new();
        registry.register(custom_def("custom1", "First"));
        let outcome = registry.register_with_component(
            FieldType::custom("custom1"),
            custom_def("other", "Second"),
            ComponentDescriptor::new("SecondComponent"),
            RegisterOptions::overriding(),
        );

        assert_eq!(outcome, RegisterOutcome::Replaced);
        let def = registry.get(&FieldType::custom("custom1")).unwrap();
        assert_eq!(def.display_name, "Second");
        assert_eq!(def.field_type, FieldType::custom("custom1"));
        assert_eq!(def.component.unwrap().name, "SecondComponent");
        assert!(!registry.is_registered(&FieldType::custom("other")));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let registry = FieldTypeRegistry::new();
        registry.register(custom_def("rating", "Star Rating"));
        registry.register(custom_def("signature", "Signature"));

        assert_eq!(registry.search("STAR").len(), 1);
        assert_eq!(registry.search("plugin").len(), 2);
        assert_eq!(registry.search("a plugin FIELD").len(), 2);
        assert!(registry.search("nothing").is_empty());
        assert_eq!(registry.search("").len(), 2);
    }

    #[test]
    fn test_get_by_category() {
        let registry = FieldTypeRegistry::new();
        registry.register(custom_def("rating", "Star Rating"));
        registry.register(
            FieldTypeDefBuilder::new(FieldType::Text)
                .display_name("Short Text")
                .category("basic")
                .build()
                .unwrap(),
        );

        assert_eq!(registry.get_by_category("basic").len(), 1);
        assert_eq!(registry.get_by_category("advanced").len(), 1);
        assert!(registry.get_by_category("choice").is_empty());
    }

    #[test]
    fn test_listeners_notified_and_unsubscribed() {
        let registry = FieldTypeRegistry::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let id = registry.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        registry.register(custom_def("rating", "Star Rating"));
        registry.register(custom_def("rating", "Ignored"));
        registry.register_with(custom_def("rating", "Stars"), RegisterOptions::overriding());
        registry.unregister(&FieldType::custom("rating"));

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.register(custom_def("rating", "Again"));

        let rating = FieldType::custom("rating");
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                RegistryEvent::Registered(rating.clone()),
                RegistryEvent::Replaced(rating.clone()),
                RegistryEvent::Unregistered(rating),
            ]
        );
    }

    #[test]
    fn test_panicking_listener_does_not_stop_broadcast() {
        let registry = FieldTypeRegistry::new();
        let calls = Arc::new(Mutex::new(0));
        registry.subscribe(|_| panic!("listener failure"));
        let counter = calls.clone();
        registry.subscribe(move |_| *counter.lock().unwrap() += 1);

        registry.register(custom_def("rating", "Star Rating"));

        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(registry.is_registered(&FieldType::custom("rating")));
    }

    #[test]
    fn test_listener_can_query_registry() {
        let registry = Arc::new(FieldTypeRegistry::new());
        let seen = Arc::new(Mutex::new(0));
        let inner = registry.clone();
        let count = seen.clone();
        registry.subscribe(move |_| *count.lock().unwrap() = inner.count());

        registry.register(custom_def("a", "A"));
        registry.register(custom_def("b", "B"));

        assert_eq!(*seen.lock().unwrap(), 2);
    }
}
