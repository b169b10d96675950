//! Integration tests for drag and drop reordering through the builder editor

use formcraft::model::{FieldEntity, FieldPatch, FieldType, FormConfig, PageEntity};
use formcraft::reorder::{DragSession, Edge, MoveRequest, compute_reorder};
use formcraft::{EngineConfig, FormEngine};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

fn form_with(pages: &[(&str, &[&str])]) -> FormConfig {
    let mut form = FormConfig::new("form", "Reorder");
    for (page_id, fields) in pages {
        form.add_page(PageEntity::new(*page_id, *page_id)).unwrap();
        for field_id in *fields {
            let field = FieldEntity::new(*field_id, FieldType::Text, *field_id, *field_id);
            form.insert_field(page_id, field, None).unwrap();
        }
    }
    form
}

fn fields(form: &FormConfig, page: &str) -> Vec<String> {
    form.page(page).unwrap().fields.clone()
}

fn all_ids(form: &FormConfig) -> BTreeSet<String> {
    form.pages_in_order()
        .flat_map(|page| page.fields.iter().cloned())
        .collect()
}

/// Small deterministic generator so move sequences are reproducible
struct XorShift(u64);

impl XorShift {
    fn next(&mut self, bound: usize) -> usize {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 % bound as u64) as usize
    }
}

/// Test dropping a field onto the top edge of the field above it
#[test]
fn test_drop_onto_top_edge_of_previous_field() {
    let mut form = form_with(&[("p1", &["f1", "f2", "f3"])]);
    let request = MoveRequest::onto_field(&form, "f2", "p1", "f1", Edge::Top).unwrap();

    compute_reorder(&form, &request).unwrap().apply(&mut form).unwrap();
    assert_eq!(fields(&form, "p1"), vec!["f2", "f1", "f3"]);
}

/// Test moving a field into an empty page
#[test]
fn test_drop_into_empty_page() {
    let mut form = form_with(&[("p1", &["f1", "f2", "f3"]), ("p2", &[])]);
    let request = MoveRequest::onto_page(&form, "f1", "p2").unwrap();

    compute_reorder(&form, &request).unwrap().apply(&mut form).unwrap();
    assert_eq!(fields(&form, "p1"), vec!["f2", "f3"]);
    assert_eq!(fields(&form, "p2"), vec!["f1"]);
    assert_eq!(form.page_of("f1"), Some("p2"));
}

/// Test that any sequence of drops keeps every field on exactly one page
#[test]
fn test_random_drops_preserve_fields() {
    let mut form = form_with(&[
        ("p1", &["a", "b", "c", "d"]),
        ("p2", &["e", "f"]),
        ("p3", &[]),
    ]);
    let expected = all_ids(&form);
    let pages = ["p1", "p2", "p3"];
    let mut rng = XorShift(0x9e37_79b9_7f4a_7c15);
    let mut applied = 0;

    for _ in 0..500 {
        let ids: Vec<String> = expected.iter().cloned().collect();
        let field = &ids[rng.next(ids.len())];
        let target_page = pages[rng.next(pages.len())];
        let target_fields = fields(&form, target_page);

        let request = if target_fields.is_empty() || rng.next(5) == 0 {
            MoveRequest::onto_page(&form, field, target_page)
        } else {
            let target = &target_fields[rng.next(target_fields.len())];
            let edge = if rng.next(2) == 0 { Edge::Top } else { Edge::Bottom };
            MoveRequest::onto_field(&form, field, target_page, target, edge)
        };
        let request = request.unwrap();

        if let Some(reorder) = compute_reorder(&form, &request) {
            reorder.apply(&mut form).unwrap();
            applied += 1;
        }

        form.check_integrity().unwrap();
        assert_eq!(all_ids(&form), expected);
        let total: usize = pages.iter().map(|p| fields(&form, p).len()).sum();
        assert_eq!(total, expected.len());
    }
    assert!(applied > 0);
}

/// Test that a drop whose result equals the current order changes nothing
#[test]
fn test_noop_drops() {
    let form = form_with(&[("p1", &["f1", "f2", "f3"])]);

    let onto_self = MoveRequest::onto_field(&form, "f2", "p1", "f2", Edge::Top).unwrap();
    assert!(compute_reorder(&form, &onto_self).is_none());

    let same_slot = MoveRequest::onto_field(&form, "f2", "p1", "f3", Edge::Top).unwrap();
    assert!(compute_reorder(&form, &same_slot).is_none());

    let mut stale = MoveRequest::onto_field(&form, "f1", "p1", "f3", Edge::Bottom).unwrap();
    stale.source_index = 2;
    assert!(compute_reorder(&form, &stale).is_none());
}

/// Test a full builder session: add fields, edit, drag across pages, save
#[test]
fn test_editor_session_with_drag() {
    let engine = FormEngine::standard().unwrap();
    let config = EngineConfig {
        debounce_ms: 500,
        ..EngineConfig::default()
    };
    let mut editor = engine.editor(FormConfig::new("signup", "Signup"), &config);

    let account = editor.add_page("Account").unwrap();
    let profile = editor.add_page("Profile").unwrap();
    let email = editor.add_field_of_type(&account, &FieldType::Email).unwrap();
    let phone = editor.add_field_of_type(&account, &FieldType::Phone).unwrap();
    let name = editor.add_field_of_type(&account, &FieldType::Text).unwrap();
    assert!(editor.add_field_of_type(&account, &FieldType::custom("hologram")).is_err());

    let t0 = Instant::now();
    editor.select_field(&phone).unwrap();
    editor
        .update_selected_field(FieldPatch::label("Mobile"), t0)
        .unwrap();
    assert_eq!(editor.form().field(&phone).unwrap().label, "Phone");
    assert_eq!(editor.preview(&phone).unwrap().label, "Mobile");

    let mut drag = DragSession::new();
    drag.start(&phone, &account);
    drag.hover_page(&profile);
    let reorder = drag.drop(editor.form()).unwrap();
    editor.apply_drag(reorder).unwrap();

    drag.start(&name, &account);
    assert_eq!(drag.hover(&email, 10.0, 0.0, 40.0), Some(Edge::Top));
    let reorder = drag.drop(editor.form()).unwrap();
    editor.apply_drag(reorder).unwrap();

    assert!(editor.commit_due(t0 + Duration::from_millis(499)).is_empty());
    assert_eq!(editor.commit_due(t0 + Duration::from_millis(500)), vec![phone.clone()]);

    let form = editor.into_form();
    assert_eq!(fields(&form, &account), vec![name, email]);
    assert_eq!(fields(&form, &profile), vec![phone.clone()]);
    assert_eq!(form.field(&phone).unwrap().label, "Mobile");
    form.check_integrity().unwrap();
}
