//! Form filling: validators per page, composed on page entry

use crate::model::{FieldEntity, FormConfig};
use crate::validation::{ValidationComposer, ValidationFailure, ValidatorSet};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Failures per field id; fields that passed are absent
pub type PageReport = BTreeMap<String, Vec<ValidationFailure>>;

pub struct FormRuntime {
    form: FormConfig,
    composer: ValidationComposer,
    current_page: Option<String>,
    validators: HashMap<String, ValidatorSet>,
}

impl FormRuntime {
    pub fn new(form: FormConfig, composer: ValidationComposer) -> Self {
        Self {
            form,
            composer,
            current_page: None,
            validators: HashMap::new(),
        }
    }

    pub fn form(&self) -> &FormConfig {
        &self.form
    }

    pub fn current_page(&self) -> Option<&str> {
        self.current_page.as_deref()
    }

    /// Make a page current and compose validators for its fields
    ///
    /// Re-entering a page recomposes into the existing sets so structural
    /// entries survive.
    pub fn enter_page(&mut self, page_id: &str) -> Result<()> {
        let page = self
            .form
            .page(page_id)
            .with_context(|| format!("Page '{}' does not exist", page_id))?;

        let mut validators = HashMap::with_capacity(page.fields.len());
        for field in self.form.fields_of(page_id) {
            let mut set = self
                .validators
                .remove(&field.id)
                .unwrap_or_else(|| ValidatorSet::structural_for(field));
            self.composer.compose_into(field, &mut set);
            validators.insert(field.id.clone(), set);
        }
        log::debug!("Entered page {} with {} validated fields", page_id, validators.len());

        self.validators = validators;
        self.current_page = Some(page_id.to_string());
        Ok(())
    }

    /// Validators of a field on the current page
    pub fn validators(&self, field_id: &str) -> Option<&ValidatorSet> {
        self.validators.get(field_id)
    }

    /// Validate one value; fields off the current page are composed on demand
    pub fn validate_field(&self, field_id: &str, value: &Value) -> Result<Vec<ValidationFailure>> {
        if let Some(set) = self.validators.get(field_id) {
            return Ok(set.validate(value));
        }
        let field = self
            .form
            .field(field_id)
            .with_context(|| format!("Field '{}' does not exist", field_id))?;
        Ok(self.composer.compose(field).validate(value))
    }

    /// Validate submitted values for every field of the current page
    ///
    /// Values are looked up by field name, then by field id; a missing value
    /// is validated as `null`.
    pub fn validate_page(&self, values: &Map<String, Value>) -> Result<PageReport> {
        let page_id = self
            .current_page
            .as_deref()
            .context("No page has been entered")?;

        let mut report = PageReport::new();
        for field in self.form.fields_of(page_id) {
            let value = value_for(field, values);
            let failures = self.validate_field(&field.id, value)?;
            if !failures.is_empty() {
                report.insert(field.id.clone(), failures);
            }
        }
        Ok(report)
    }

    /// Validate every page in order, without changing the current page
    pub fn validate_all(&self, values: &Map<String, Value>) -> Result<PageReport> {
        let mut report = PageReport::new();
        for page in self.form.pages_in_order() {
            for field in self.form.fields_of(&page.id) {
                let failures = self.composer.compose(field).validate(value_for(field, values));
                if !failures.is_empty() {
                    report.insert(field.id.clone(), failures);
                }
            }
        }
        Ok(report)
    }
}

static MISSING: Value = Value::Null;

fn value_for<'a>(field: &FieldEntity, values: &'a Map<String, Value>) -> &'a Value {
    values
        .get(&field.name)
        .or_else(|| values.get(&field.id))
        .unwrap_or(&MISSING)
}
