//! Integration tests for validator composition and the filling runtime
//!
//! Forms are loaded from the same JSON shape the builder persists.

use formcraft::FormEngine;
use formcraft::model::{FieldEntity, FieldType, FormConfig, RuleConfig};
use formcraft::validation::ValidatorOrigin;
use serde_json::{Map, Value, json};

fn values(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn contact_form() -> FormConfig {
    serde_json::from_value(json!({
        "id": "contact",
        "name": "Contact us",
        "pages": ["p1", "p2"],
        "pageEntities": {
            "p1": { "id": "p1", "name": "You", "fields": ["f-name", "f-email", "f-bio"] },
            "p2": { "id": "p2", "name": "Visit", "fields": ["f-when", "f-files"] }
        },
        "fieldEntities": {
            "f-name": {
                "id": "f-name", "type": "text", "name": "fullName", "label": "Full name",
                "required": true,
                "validation": { "custom": {
                    "minLength": { "value": 3, "message": "", "kind": "withValue" }
                } }
            },
            "f-email": {
                "id": "f-email", "type": "email", "name": "email", "label": "Email",
                "validation": { "custom": {
                    "email": { "message": "Check the address", "kind": "binary" },
                    "doesNotExist": { "value": 1, "message": "never", "kind": "withValue" }
                } }
            },
            "f-bio": {
                "id": "f-bio", "type": "richtext", "name": "bio", "label": "About you",
                "validation": { "custom": {
                    "maxLength": { "value": 10, "message": "Keep it under {value}", "kind": "withValue" },
                    "crossField": { "value": "f-name", "message": "never", "kind": "complex" }
                } }
            },
            "f-when": {
                "id": "f-when", "type": "date", "name": "when", "label": "Visit date",
                "validation": { "custom": {
                    "minDate": { "value": "2024-01-01", "message": "", "kind": "withValue" }
                } }
            },
            "f-files": {
                "id": "f-files", "type": "file", "name": "files", "label": "Attachments",
                "validation": { "custom": {
                    "fileTypes": { "value": ["pdf", "image/*"], "message": "Only {value}", "kind": "withValue" },
                    "maxFiles": { "value": 2, "message": "", "kind": "withValue" }
                } }
            }
        }
    }))
    .unwrap()
}

/// Test that a stored form validates page by page with the configured messages
#[test]
fn test_first_page_validation() {
    let engine = FormEngine::standard().unwrap();
    let mut runtime = engine.runtime(contact_form());
    runtime.enter_page("p1").unwrap();

    let report = runtime
        .validate_page(&values(json!({
            "fullName": "Al",
            "email": "al@",
            "bio": "far too long for the limit"
        })))
        .unwrap();

    assert_eq!(report["f-name"][0].key, "minLength");
    assert_eq!(report["f-name"][0].message, "Must be at least 3 characters");
    assert_eq!(report["f-email"].len(), 1);
    assert_eq!(report["f-email"][0].message, "Check the address");
    assert_eq!(report["f-bio"][0].message, "Keep it under 10");

    let report = runtime
        .validate_page(&values(json!({ "fullName": "Alice", "email": "al@example.com" })))
        .unwrap();
    assert!(report.is_empty(), "{:?}", report);
}

/// Test that the structural required check comes from the field, not its rules
#[test]
fn test_structural_required_check() {
    let engine = FormEngine::standard().unwrap();
    let mut runtime = engine.runtime(contact_form());
    runtime.enter_page("p1").unwrap();

    let set = runtime.validators("f-name").unwrap();
    assert_eq!(set.get("required").unwrap().origin, ValidatorOrigin::Structural);
    assert_eq!(set.get("minLength").unwrap().origin, ValidatorOrigin::Custom);

    let report = runtime.validate_page(&Map::new()).unwrap();
    let keys: Vec<_> = report["f-name"].iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, vec!["required"]);
    assert!(!report.contains_key("f-email"));
}

/// Test that unknown keys and unsupported kinds compose to checks that always pass
#[test]
fn test_unresolvable_rules_never_fail() {
    let engine = FormEngine::standard().unwrap();
    let form = contact_form();
    let composer = engine.composer();

    let email = composer.compose(form.field("f-email").unwrap());
    assert!(email.get("doesNotExist").unwrap().check(&json!("anything")));

    let bio = composer.compose(form.field("f-bio").unwrap());
    assert!(bio.get("crossField").unwrap().check(&json!("anything")));
}

/// Test that a type with no rules of its own borrows the fallback type's rules
#[test]
fn test_fallback_type_rules() {
    let form = contact_form();
    let bio = form.field("f-bio").unwrap();

    let text_fallback = FormEngine::standard().unwrap().composer().compose(bio);
    assert!(!text_fallback.check_all(&json!("more than ten characters")));

    let number_fallback = FormEngine::standard()
        .unwrap()
        .with_fallback_type(FieldType::Number)
        .composer()
        .compose(bio);
    assert!(number_fallback.check_all(&json!("more than ten characters")));
}

#[test]
fn test_second_page_date_and_files() {
    let engine = FormEngine::standard().unwrap();
    let mut runtime = engine.runtime(contact_form());
    runtime.enter_page("p2").unwrap();

    let report = runtime
        .validate_page(&values(json!({
            "when": "2023-12-31",
            "files": [
                { "name": "cv.pdf", "size": 1200, "type": "application/pdf" },
                { "name": "photo.png", "size": 5000, "type": "image/png" },
                { "name": "notes.txt", "size": 10, "type": "text/plain" }
            ]
        })))
        .unwrap();

    assert_eq!(report["f-when"][0].message, "Date must be on or after 2024-01-01");
    let mut keys: Vec<_> = report["f-files"].iter().map(|f| f.key.clone()).collect();
    keys.sort();
    assert_eq!(keys, vec!["fileTypes", "maxFiles"]);
    let file_types = report["f-files"].iter().find(|f| f.key == "fileTypes").unwrap();
    assert_eq!(file_types.message, "Only pdf, image/*");

    let report = runtime
        .validate_page(&values(json!({
            "when": "2024-01-01",
            "files": [{ "name": "cv.pdf", "size": 1200, "type": "application/pdf" }]
        })))
        .unwrap();
    assert!(report.is_empty(), "{:?}", report);
}

/// Test that re-entering a page picks up edited rules and keeps structural checks
#[test]
fn test_reentering_page_recomposes() {
    let engine = FormEngine::standard().unwrap();
    let mut form = contact_form();
    let mut runtime = engine.runtime(form.clone());
    runtime.enter_page("p1").unwrap();
    let before = runtime.validators("f-name").unwrap().keys();

    runtime.enter_page("p2").unwrap();
    runtime.enter_page("p1").unwrap();
    assert_eq!(runtime.validators("f-name").unwrap().keys(), before);

    let name = form.field_entities.get_mut("f-name").unwrap();
    name.validation.custom.clear();
    let name: FieldEntity = name.clone().with_rule("pattern", RuleConfig::with_value("^[A-Z]", "Capitalize"));
    form.field_entities.insert(name.id.clone(), name);

    let mut runtime = engine.runtime(form);
    runtime.enter_page("p1").unwrap();
    let set = runtime.validators("f-name").unwrap();
    assert_eq!(set.keys(), vec!["pattern", "required"]);
    assert_eq!(
        runtime.validate_field("f-name", &json!("alice")).unwrap()[0].message,
        "Capitalize"
    );
}

#[test]
fn test_validate_all_spans_pages() {
    let engine = FormEngine::standard().unwrap();
    let runtime = engine.runtime(contact_form());

    let report = runtime
        .validate_all(&values(json!({
            "fullName": "Alice",
            "email": "alice@example.com",
            "when": "2020-05-01"
        })))
        .unwrap();
    assert_eq!(report.keys().collect::<Vec<_>>(), vec!["f-when"]);
    assert_eq!(runtime.current_page(), None);
}
