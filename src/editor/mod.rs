//! Builder-side mutations of a form
//!
//! Structural edits (pages, adding and removing fields, ordering) apply at
//! once. Attribute edits on the selected field are debounced and committed
//! by [`FormEditor::commit_due`] or [`FormEditor::flush`].

pub mod debounce;

pub use debounce::Debouncer;

use crate::model::{FieldEntity, FieldPatch, FieldType, FormConfig, PageEntity};
use crate::registry::FieldTypeRegistry;
use crate::reorder::Reorder;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub struct FormEditor {
    form: FormConfig,
    field_types: Arc<FieldTypeRegistry>,
    selected: Option<String>,
    pending: Debouncer<String, FieldPatch>,
}

impl FormEditor {
    pub fn new(form: FormConfig, field_types: Arc<FieldTypeRegistry>, debounce: Duration) -> Self {
        Self {
            form,
            field_types,
            selected: None,
            pending: Debouncer::new(debounce),
        }
    }

    pub fn form(&self) -> &FormConfig {
        &self.form
    }

    /// Commit everything pending and hand the form back
    pub fn into_form(mut self) -> FormConfig {
        self.flush();
        self.form
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selected field as last committed
    pub fn selected_field(&self) -> Option<&FieldEntity> {
        self.selected.as_deref().and_then(|id| self.form.field(id))
    }

    /// A field with its pending edits applied
    pub fn preview(&self, field_id: &str) -> Option<FieldEntity> {
        let mut field = self.form.field(field_id)?.clone();
        if let Some(patch) = self.pending.peek(&field_id.to_string()) {
            patch.apply_to(&mut field);
        }
        Some(field)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.next_deadline()
    }

    /// Append a new empty page; returns its id
    pub fn add_page(&mut self, name: &str) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.form.add_page(PageEntity::new(id.clone(), name))?;
        log::debug!("Added page {} ({})", id, name);
        Ok(id)
    }

    /// Append a field to a page and select it
    pub fn add_field(&mut self, page_id: &str, field: FieldEntity) -> Result<()> {
        let id = field.id.clone();
        self.form
            .insert_field(page_id, field, None)
            .with_context(|| format!("Failed to add field '{}'", id))?;
        self.selected = Some(id);
        Ok(())
    }

    /// Append a field of a registered type, seeded from the type's defaults
    pub fn add_field_of_type(&mut self, page_id: &str, field_type: &FieldType) -> Result<String> {
        let def = self
            .field_types
            .get(field_type)
            .with_context(|| format!("Field type '{}' is not registered", field_type))?;

        let id = Uuid::new_v4().to_string();
        let short = id.split('-').next().unwrap_or(&id).to_string();
        let mut field = FieldEntity::new(
            id.clone(),
            field_type.clone(),
            format!("{}_{}", field_type, short),
            "",
        );
        def.default_config.apply(&mut field);
        if field.label.is_empty() {
            field.label = def.display_name.clone();
        }

        self.add_field(page_id, field)?;
        Ok(id)
    }

    pub fn select_field(&mut self, field_id: &str) -> Result<()> {
        if self.form.field(field_id).is_none() {
            anyhow::bail!("Field '{}' does not exist", field_id);
        }
        self.selected = Some(field_id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Queue an edit of the selected field
    ///
    /// Edits to the same field merge; attributes from the later edit win.
    pub fn update_selected_field(&mut self, patch: FieldPatch, now: Instant) -> Result<()> {
        let id = self
            .selected
            .clone()
            .context("No field is selected")?;
        if patch.is_empty() {
            return Ok(());
        }
        self.pending.schedule_merge(id, patch, now, FieldPatch::merge);
        Ok(())
    }

    /// Commit edits whose quiet period has elapsed; returns the ids written
    pub fn commit_due(&mut self, now: Instant) -> Vec<String> {
        let due = self.pending.due(now);
        self.commit(due)
    }

    /// Commit every pending edit now
    pub fn flush(&mut self) -> Vec<String> {
        let all = self.pending.flush();
        self.commit(all)
    }

    fn commit(&mut self, writes: Vec<(String, FieldPatch)>) -> Vec<String> {
        let mut written = Vec::with_capacity(writes.len());
        for (id, patch) in writes {
            match self.form.field_mut(&id) {
                Some(field) => {
                    patch.apply_to(field);
                    written.push(id);
                }
                None => log::debug!("Dropping edit for removed field {}", id),
            }
        }
        written
    }

    /// Delete a field; its pending edits are discarded
    pub fn delete_field(&mut self, field_id: &str) -> Result<FieldEntity> {
        self.pending.cancel(&field_id.to_string());
        if self.selected.as_deref() == Some(field_id) {
            self.selected = None;
        }
        self.form
            .remove_field(field_id)
            .with_context(|| format!("Field '{}' does not exist", field_id))
    }

    pub fn set_page_fields(&mut self, page_id: &str, fields: Vec<String>) -> Result<()> {
        self.form.set_page_fields(page_id, fields)
    }

    /// Write the result of a drop
    pub fn apply_drag(&mut self, reorder: Reorder) -> Result<()> {
        reorder.apply(&mut self.form)
    }

    /// Delete a page with all its fields
    pub fn delete_page(&mut self, page_id: &str) -> Result<PageEntity> {
        let page = self.form.remove_page(page_id)?;
        for field_id in &page.fields {
            self.pending.cancel(field_id);
            if self.selected.as_ref() == Some(field_id) {
                self.selected = None;
            }
        }
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldAttribute, FieldWidth, RuleConfig};
    use crate::registry::FieldTypeDefBuilder;
    use crate::reorder::{DragSession, MoveRequest, compute_reorder};

    const WINDOW: Duration = Duration::from_millis(750);

    fn editor() -> (FormEditor, String) {
        let types = Arc::new(FieldTypeRegistry::new());
        types.register(
            FieldTypeDefBuilder::new(FieldType::Email)
                .display_name("Email")
                .category("basic")
                .default_placeholder("name@example.com")
                .default_width(FieldWidth::Half)
                .build()
                .unwrap(),
        );
        let mut editor = FormEditor::new(FormConfig::new("form", "Signup"), types, WINDOW);
        let page = editor.add_page("Details").unwrap();
        (editor, page)
    }

    fn text(id: &str) -> FieldEntity {
        FieldEntity::new(id, FieldType::Text, id, id)
    }

    #[test]
    fn test_add_field_of_type_uses_defaults() {
        let (mut editor, page) = editor();
        let id = editor.add_field_of_type(&page, &FieldType::Email).unwrap();

        let field = editor.form().field(&id).unwrap();
        assert_eq!(field.label, "Email");
        assert_eq!(field.placeholder.as_deref(), Some("name@example.com"));
        assert_eq!(field.width, FieldWidth::Half);
        assert!(field.name.starts_with("email_"));
        assert_eq!(editor.selected_id(), Some(id.as_str()));

        assert!(editor.add_field_of_type(&page, &FieldType::Date).is_err());
    }

    #[test]
    fn test_updates_are_debounced_and_merged() {
        let (mut editor, page) = editor();
        editor.add_field(&page, text("f1")).unwrap();
        let start = Instant::now();

        editor
            .update_selected_field(FieldPatch::label("First"), start)
            .unwrap();
        let mut patch = FieldPatch::label("Second");
        patch.placeholder = Some("type here".into());
        editor
            .update_selected_field(patch, start + Duration::from_millis(500))
            .unwrap();

        assert_eq!(editor.form().field("f1").unwrap().label, "f1");
        assert_eq!(editor.preview("f1").unwrap().label, "Second");
        assert!(editor.commit_due(start + Duration::from_millis(800)).is_empty());

        let written = editor.commit_due(start + Duration::from_millis(1300));
        assert_eq!(written, vec!["f1"]);
        let field = editor.form().field("f1").unwrap();
        assert_eq!(field.label, "Second");
        assert_eq!(field.placeholder.as_deref(), Some("type here"));
    }

    #[test]
    fn test_debounced_clear_resets_attribute() {
        let (mut editor, page) = editor();
        let id = editor.add_field_of_type(&page, &FieldType::Email).unwrap();
        assert!(editor.selected_field().unwrap().placeholder.is_some());
        let start = Instant::now();

        editor
            .update_selected_field(FieldPatch::clearing(FieldAttribute::Placeholder), start)
            .unwrap();
        assert_eq!(editor.preview(&id).unwrap().placeholder, None);
        assert!(editor.form().field(&id).unwrap().placeholder.is_some());

        editor.flush();
        assert_eq!(editor.form().field(&id).unwrap().placeholder, None);
    }

    #[test]
    fn test_update_without_selection_fails() {
        let (mut editor, _) = editor();
        assert!(editor
            .update_selected_field(FieldPatch::label("x"), Instant::now())
            .is_err());
    }

    #[test]
    fn test_delete_discards_pending_edit() {
        let (mut editor, page) = editor();
        editor.add_field(&page, text("f1")).unwrap();
        let mut patch = FieldPatch::default();
        patch.validation = Some(
            text("f1")
                .with_rule("required", RuleConfig::binary("Required"))
                .validation,
        );
        editor.update_selected_field(patch, Instant::now()).unwrap();

        editor.delete_field("f1").unwrap();
        assert!(editor.selected_id().is_none());
        assert!(!editor.has_pending());
        assert!(editor.flush().is_empty());
        assert!(editor.form().check_integrity().is_ok());
    }

    #[test]
    fn test_pending_edits_follow_drag() {
        let (mut editor, page) = editor();
        for id in ["F1", "F2", "F3"] {
            editor.add_field(&page, text(id)).unwrap();
        }
        editor.select_field("F3").unwrap();
        editor
            .update_selected_field(FieldPatch::label("Moved"), Instant::now())
            .unwrap();

        let mut session = DragSession::new();
        session.start("F3", &page);
        session.hover("F1", 0.0, 0.0, 10.0);
        let reorder = session.drop(editor.form()).unwrap();
        editor.apply_drag(reorder).unwrap();

        let form = editor.into_form();
        assert_eq!(form.page(&page).unwrap().fields, vec!["F3", "F1", "F2"]);
        assert_eq!(form.field("F3").unwrap().label, "Moved");
    }

    #[test]
    fn test_delete_page_cascades() {
        let (mut editor, first) = editor();
        let second = editor.add_page("Extra").unwrap();
        editor.add_field(&first, text("a")).unwrap();
        editor.add_field(&second, text("b")).unwrap();

        let request = MoveRequest::onto_page(editor.form(), "a", &second).unwrap();
        let reorder = compute_reorder(editor.form(), &request).unwrap();
        editor.apply_drag(reorder).unwrap();
        assert_eq!(editor.form().page(&second).unwrap().fields, vec!["b", "a"]);

        let removed = editor.delete_page(&second).unwrap();
        assert_eq!(removed.fields.len(), 2);
        assert!(editor.form().field_entities.is_empty());
        assert!(editor.selected_id().is_none());
    }
}
