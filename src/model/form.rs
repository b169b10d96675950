//! Pages and the form configuration that owns them

use super::field::FieldEntity;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One page of a form; `fields` is the display and tab order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl PageEntity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn position(&self, field_id: &str) -> Option<usize> {
        self.fields.iter().position(|id| id == field_id)
    }
}

/// Complete form: ordered pages plus the entities they reference
///
/// Every field id appears in exactly one page's `fields` list and every
/// listed id has an entry in `field_entities`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pages: Vec<String>,
    #[serde(default)]
    pub page_entities: HashMap<String, PageEntity>,
    #[serde(default)]
    pub field_entities: HashMap<String, FieldEntity>,
}

impl FormConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn page(&self, page_id: &str) -> Option<&PageEntity> {
        self.page_entities.get(page_id)
    }

    pub(crate) fn page_mut(&mut self, page_id: &str) -> Option<&mut PageEntity> {
        self.page_entities.get_mut(page_id)
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldEntity> {
        self.field_entities.get(field_id)
    }

    pub(crate) fn field_mut(&mut self, field_id: &str) -> Option<&mut FieldEntity> {
        self.field_entities.get_mut(field_id)
    }

    /// Pages in display order
    pub fn pages_in_order(&self) -> impl Iterator<Item = &PageEntity> {
        self.pages.iter().filter_map(|id| self.page_entities.get(id))
    }

    /// Fields of a page in display order
    pub fn fields_of(&self, page_id: &str) -> Vec<&FieldEntity> {
        self.page(page_id)
            .map(|page| {
                page.fields
                    .iter()
                    .filter_map(|id| self.field_entities.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Id of the page that owns a field
    pub fn page_of(&self, field_id: &str) -> Option<&str> {
        self.pages_in_order()
            .find(|page| page.fields.iter().any(|id| id == field_id))
            .map(|page| page.id.as_str())
    }

    /// Append a page
    pub fn add_page(&mut self, page: PageEntity) -> Result<()> {
        if self.page_entities.contains_key(&page.id) {
            anyhow::bail!("Page '{}' already exists", page.id);
        }
        for field_id in &page.fields {
            if !self.field_entities.contains_key(field_id) {
                anyhow::bail!("Page '{}' references unknown field '{}'", page.id, field_id);
            }
            if let Some(owner) = self.page_of(field_id) {
                anyhow::bail!("Field '{}' is already owned by page '{}'", field_id, owner);
            }
        }
        self.pages.push(page.id.clone());
        self.page_entities.insert(page.id.clone(), page);
        Ok(())
    }

    /// Remove a page together with every field it owns
    pub fn remove_page(&mut self, page_id: &str) -> Result<PageEntity> {
        let page = self
            .page_entities
            .remove(page_id)
            .with_context(|| format!("Page '{}' does not exist", page_id))?;
        self.pages.retain(|id| id != page_id);
        for field_id in &page.fields {
            self.field_entities.remove(field_id);
        }
        log::debug!("Removed page {} with {} fields", page_id, page.fields.len());
        Ok(page)
    }

    /// Insert a field into a page, at `index` or at the end
    pub fn insert_field(
        &mut self,
        page_id: &str,
        field: FieldEntity,
        index: Option<usize>,
    ) -> Result<()> {
        if self.field_entities.contains_key(&field.id) {
            anyhow::bail!("Field '{}' already exists", field.id);
        }
        let page = self
            .page_entities
            .get_mut(page_id)
            .with_context(|| format!("Page '{}' does not exist", page_id))?;

        let at = index.unwrap_or(page.fields.len()).min(page.fields.len());
        page.fields.insert(at, field.id.clone());
        self.field_entities.insert(field.id.clone(), field);
        Ok(())
    }

    /// Remove a field and drop it from its owning page's list
    pub fn remove_field(&mut self, field_id: &str) -> Option<FieldEntity> {
        let field = self.field_entities.remove(field_id)?;
        for page in self.page_entities.values_mut() {
            page.fields.retain(|id| id != field_id);
        }
        Some(field)
    }

    /// Replace the ordered field list of a page
    ///
    /// Ids currently owned by another page move to this one. The call is
    /// rejected if an id is unknown or repeated, or if a field owned by this
    /// page would be left without a page.
    pub fn set_page_fields(&mut self, page_id: &str, fields: Vec<String>) -> Result<()> {
        let current = self
            .page(page_id)
            .with_context(|| format!("Page '{}' does not exist", page_id))?;

        let mut seen = HashSet::new();
        for id in &fields {
            if !self.field_entities.contains_key(id) {
                anyhow::bail!("Unknown field '{}' in order for page '{}'", id, page_id);
            }
            if !seen.insert(id.as_str()) {
                anyhow::bail!("Field '{}' listed twice for page '{}'", id, page_id);
            }
        }
        if let Some(orphan) = current.fields.iter().find(|id| !seen.contains(id.as_str())) {
            anyhow::bail!(
                "Field '{}' would no longer belong to any page; move or delete it first",
                orphan
            );
        }

        for (id, page) in self.page_entities.iter_mut() {
            if id != page_id {
                page.fields.retain(|field_id| !seen.contains(field_id.as_str()));
            }
        }
        if let Some(page) = self.page_mut(page_id) {
            page.fields = fields;
        }
        Ok(())
    }

    /// Verify the page/field ownership invariant
    pub fn check_integrity(&self) -> Result<()> {
        for page_id in &self.pages {
            if !self.page_entities.contains_key(page_id) {
                anyhow::bail!("Page order references missing page '{}'", page_id);
            }
        }
        if self.pages.len() != self.page_entities.len() {
            anyhow::bail!(
                "Page order lists {} pages but {} are defined",
                self.pages.len(),
                self.page_entities.len()
            );
        }

        let mut owner: HashMap<&str, &str> = HashMap::new();
        for page in self.pages_in_order() {
            for field_id in &page.fields {
                if !self.field_entities.contains_key(field_id) {
                    anyhow::bail!("Page '{}' lists unknown field '{}'", page.id, field_id);
                }
                if let Some(previous) = owner.insert(field_id, &page.id) {
                    anyhow::bail!(
                        "Field '{}' is listed by both '{}' and '{}'",
                        field_id,
                        previous,
                        page.id
                    );
                }
            }
        }
        if let Some(orphan) = self
            .field_entities
            .keys()
            .find(|id| !owner.contains_key(id.as_str()))
        {
            anyhow::bail!("Field '{}' is not listed by any page", orphan);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::FieldType;

    fn form_with(pages: &[(&str, &[&str])]) -> FormConfig {
        let mut form = FormConfig::new("form", "Test");
        for (page_id, fields) in pages {
            form.add_page(PageEntity::new(*page_id, *page_id)).unwrap();
            for field_id in *fields {
                let field = FieldEntity::new(*field_id, FieldType::Text, *field_id, *field_id);
                form.insert_field(page_id, field, None).unwrap();
            }
        }
        form
    }

    #[test]
    fn test_insert_and_remove_cascade() {
        let mut form = form_with(&[("p1", &["f1", "f2", "f3"])]);
        assert_eq!(form.page("p1").unwrap().fields, vec!["f1", "f2", "f3"]);

        let removed = form.remove_field("f2").unwrap();
        assert_eq!(removed.id, "f2");
        assert_eq!(form.page("p1").unwrap().fields, vec!["f1", "f3"]);
        assert!(form.check_integrity().is_ok());
    }

    #[test]
    fn test_insert_duplicate_field_rejected() {
        let mut form = form_with(&[("p1", &["f1"])]);
        let dup = FieldEntity::new("f1", FieldType::Text, "f1", "f1");
        assert!(form.insert_field("p1", dup, None).is_err());
        let field = FieldEntity::new("f9", FieldType::Text, "f9", "f9");
        assert!(form.insert_field("missing", field, None).is_err());
    }

    #[test]
    fn test_set_page_fields_permutes() {
        let mut form = form_with(&[("p1", &["f1", "f2", "f3"])]);
        form.set_page_fields("p1", vec!["f3".into(), "f1".into(), "f2".into()])
            .unwrap();
        assert_eq!(form.page("p1").unwrap().fields, vec!["f3", "f1", "f2"]);
    }

    #[test]
    fn test_set_page_fields_moves_ownership() {
        let mut form = form_with(&[("p1", &["f1", "f2"]), ("p2", &["f3"])]);
        form.set_page_fields("p2", vec!["f1".into(), "f3".into()])
            .unwrap();

        assert_eq!(form.page("p1").unwrap().fields, vec!["f2"]);
        assert_eq!(form.page("p2").unwrap().fields, vec!["f1", "f3"]);
        assert!(form.check_integrity().is_ok());
    }

    #[test]
    fn test_set_page_fields_rejects_orphans_and_duplicates() {
        let mut form = form_with(&[("p1", &["f1", "f2"])]);
        assert!(form.set_page_fields("p1", vec!["f1".into()]).is_err());
        assert!(form
            .set_page_fields("p1", vec!["f1".into(), "f1".into(), "f2".into()])
            .is_err());
        assert!(form
            .set_page_fields("p1", vec!["f1".into(), "f2".into(), "nope".into()])
            .is_err());
        assert_eq!(form.page("p1").unwrap().fields, vec!["f1", "f2"]);
    }

    #[test]
    fn test_remove_page_drops_its_fields() {
        let mut form = form_with(&[("p1", &["f1"]), ("p2", &["f2", "f3"])]);
        form.remove_page("p2").unwrap();
        assert_eq!(form.pages, vec!["p1"]);
        assert!(form.field("f2").is_none());
        assert!(form.check_integrity().is_ok());
    }

    #[test]
    fn test_integrity_detects_double_ownership() {
        let mut form = form_with(&[("p1", &["f1"]), ("p2", &[])]);
        form.page_mut("p2").unwrap().fields.push("f1".into());
        assert!(form.check_integrity().is_err());
    }
}
