//! Catalog of field categories used to group field types for presentation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Presentation group for field types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    pub order: u32,
}

impl FieldCategory {
    pub fn new(id: &str, name: &str, description: &str, order: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            order,
        }
    }
}

/// Registry of field categories keyed by id
pub struct CategoryCatalog {
    categories: RwLock<HashMap<String, FieldCategory>>,
}

impl CategoryCatalog {
    pub fn new() -> Self {
        Self {
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a category
    pub fn register(&self, category: FieldCategory) {
        let mut categories = self
            .categories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        log::debug!("Registered field category: {} ({})", category.id, category.name);
        if let Some(previous) = categories.insert(category.id.clone(), category) {
            log::debug!("Replaced field category {}", previous.id);
        }
    }

    pub fn get(&self, id: &str) -> Option<FieldCategory> {
        self.categories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.categories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// All categories by `order`, ties broken by id
    pub fn all(&self) -> Vec<FieldCategory> {
        let categories = self.categories.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<_> = categories.values().cloned().collect();
        all.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        all
    }

    pub fn count(&self) -> usize {
        self.categories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sorted_by_order() {
        let catalog = CategoryCatalog::new();
        catalog.register(FieldCategory::new("advanced", "Advanced", "", 30));
        catalog.register(FieldCategory::new("basic", "Basic", "", 10));
        catalog.register(FieldCategory::new("choice", "Choice", "", 20));

        let ids: Vec<_> = catalog.all().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["basic", "choice", "advanced"]);
    }

    #[test]
    fn test_register_replaces() {
        let catalog = CategoryCatalog::new();
        catalog.register(FieldCategory::new("basic", "Basic", "", 10));
        catalog.register(FieldCategory::new("basic", "Basic Fields", "Everyday inputs", 5));

        assert_eq!(catalog.count(), 1);
        let basic = catalog.get("basic").unwrap();
        assert_eq!(basic.name, "Basic Fields");
        assert_eq!(basic.order, 5);
        assert!(catalog.get("missing").is_none());
    }
}
