//! Field entities and the closed set of field types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Discriminant selecting a field's input kind
///
/// Built-in kinds are listed explicitly so behaviour that depends on the
/// kind is checked exhaustively. `Custom` carries the tag of a type that
/// was registered by a plugin at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Number,
    Phone,
    Url,
    Dropdown,
    Radio,
    Checkbox,
    Date,
    Datetime,
    Time,
    File,
    Custom(String),
}

impl FieldType {
    /// All built-in field types in presentation order
    pub fn builtin() -> [FieldType; 13] {
        [
            FieldType::Text,
            FieldType::Textarea,
            FieldType::Email,
            FieldType::Number,
            FieldType::Phone,
            FieldType::Url,
            FieldType::Dropdown,
            FieldType::Radio,
            FieldType::Checkbox,
            FieldType::Date,
            FieldType::Datetime,
            FieldType::Time,
            FieldType::File,
        ]
    }

    /// Create a plugin field type from its tag
    ///
    /// Tags matching a built-in type resolve to that type.
    pub fn custom(tag: impl Into<String>) -> Self {
        FieldType::from(tag.into())
    }

    /// The wire tag of this type (e.g. "datetime")
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Phone => "phone",
            FieldType::Url => "url",
            FieldType::Dropdown => "dropdown",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Time => "time",
            FieldType::File => "file",
            FieldType::Custom(tag) => tag,
        }
    }

    /// Whether fields of this type pick from a list of options
    pub fn has_options(&self) -> bool {
        match self {
            FieldType::Dropdown | FieldType::Radio | FieldType::Checkbox => true,
            FieldType::Text
            | FieldType::Textarea
            | FieldType::Email
            | FieldType::Number
            | FieldType::Phone
            | FieldType::Url
            | FieldType::Date
            | FieldType::Datetime
            | FieldType::Time
            | FieldType::File
            | FieldType::Custom(_) => false,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, FieldType::Custom(_))
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "text" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "email" => FieldType::Email,
            "number" => FieldType::Number,
            "phone" => FieldType::Phone,
            "url" => FieldType::Url,
            "dropdown" => FieldType::Dropdown,
            "radio" => FieldType::Radio,
            "checkbox" => FieldType::Checkbox,
            "date" => FieldType::Date,
            "datetime" => FieldType::Datetime,
            "time" => FieldType::Time,
            "file" => FieldType::File,
            _ => FieldType::Custom(tag),
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        FieldType::from(tag.to_string())
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        match ty {
            FieldType::Custom(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldType::from(s))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal space a field occupies in its row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldWidth {
    #[serde(rename = "25%")]
    Quarter,
    #[serde(rename = "33%")]
    Third,
    #[serde(rename = "50%")]
    Half,
    #[serde(rename = "66%")]
    TwoThirds,
    #[serde(rename = "75%")]
    ThreeQuarters,
    #[default]
    #[serde(rename = "100%")]
    Full,
}

impl FieldWidth {
    pub fn percent(&self) -> u8 {
        match self {
            FieldWidth::Quarter => 25,
            FieldWidth::Third => 33,
            FieldWidth::Half => 50,
            FieldWidth::TwoThirds => 66,
            FieldWidth::ThreeQuarters => 75,
            FieldWidth::Full => 100,
        }
    }
}

/// One selectable option of a choice field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            helper_text: None,
        }
    }
}

/// How a stored rule configuration parameterizes its validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConfigKind {
    /// On/off rule; only the message is configurable
    Binary,
    /// Rule parameterized by a value plus the message
    WithValue,
    /// Any other tag; kept verbatim so it round-trips, composes to a no-op
    Unsupported(String),
}

impl From<String> for ConfigKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "binary" => ConfigKind::Binary,
            "withValue" => ConfigKind::WithValue,
            _ => ConfigKind::Unsupported(tag),
        }
    }
}

impl From<ConfigKind> for String {
    fn from(kind: ConfigKind) -> Self {
        match kind {
            ConfigKind::Binary => "binary".to_string(),
            ConfigKind::WithValue => "withValue".to_string(),
            ConfigKind::Unsupported(tag) => tag,
        }
    }
}

/// Stored configuration of one custom validation rule on a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub message: String,
    pub kind: ConfigKind,
}

impl RuleConfig {
    /// Enable an on/off rule with the given message
    pub fn binary(message: impl Into<String>) -> Self {
        Self {
            value: Value::Bool(true),
            message: message.into(),
            kind: ConfigKind::Binary,
        }
    }

    /// Enable a parameterized rule
    pub fn with_value(value: impl Into<Value>, message: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            message: message.into(),
            kind: ConfigKind::WithValue,
        }
    }
}

/// Validation block of a field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValidation {
    /// Rule key -> configuration, as chosen in the builder
    #[serde(default)]
    pub custom: BTreeMap<String, RuleConfig>,
}

/// A single form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default)]
    pub width: FieldWidth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_multi_select: Option<bool>,
    /// Structural required-ness imposed by the renderer, independent of custom rules
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub validation: FieldValidation,
}

impl FieldEntity {
    pub fn new(
        id: impl Into<String>,
        field_type: FieldType,
        name: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            field_type,
            name: name.into(),
            label: label.into(),
            placeholder: None,
            helper_text: None,
            default_value: None,
            options: None,
            width: FieldWidth::default(),
            allow_multi_select: None,
            required: false,
            validation: FieldValidation::default(),
        }
    }

    /// Add or replace a custom rule configuration
    pub fn with_rule(mut self, key: impl Into<String>, config: RuleConfig) -> Self {
        self.validation.custom.insert(key.into(), config);
        self
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Whether the field accepts several values at once
    pub fn is_multi_value(&self) -> bool {
        match self.field_type {
            FieldType::Checkbox | FieldType::File => true,
            FieldType::Dropdown => self.allow_multi_select.unwrap_or(false),
            _ => false,
        }
    }
}

/// Optional field attribute a patch can reset to unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldAttribute {
    Placeholder,
    HelperText,
    DefaultValue,
    Options,
    AllowMultiSelect,
}

/// Partial update of a field, as produced by one builder edit
///
/// Unset attributes leave the field untouched. Attributes listed in `clear`
/// are reset to `None`; a value set in the same patch wins over the clear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<FieldWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_multi_select: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub clear: BTreeSet<FieldAttribute>,
}

impl FieldPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    /// Patch that resets one optional attribute
    pub fn clearing(attribute: FieldAttribute) -> Self {
        Self {
            clear: BTreeSet::from([attribute]),
            ..Default::default()
        }
    }

    /// Combine with a later patch; attributes set or cleared in `later` win
    pub fn merge(self, later: FieldPatch) -> FieldPatch {
        let cleared = &later.clear;
        let placeholder = later.placeholder.or(unless_cleared(
            self.placeholder,
            cleared,
            FieldAttribute::Placeholder,
        ));
        let helper_text = later.helper_text.or(unless_cleared(
            self.helper_text,
            cleared,
            FieldAttribute::HelperText,
        ));
        let default_value = later.default_value.or(unless_cleared(
            self.default_value,
            cleared,
            FieldAttribute::DefaultValue,
        ));
        let options = later
            .options
            .or(unless_cleared(self.options, cleared, FieldAttribute::Options));
        let allow_multi_select = later.allow_multi_select.or(unless_cleared(
            self.allow_multi_select,
            cleared,
            FieldAttribute::AllowMultiSelect,
        ));

        let mut clear: BTreeSet<FieldAttribute> = self
            .clear
            .into_iter()
            .chain(later.clear)
            .collect();
        if placeholder.is_some() {
            clear.remove(&FieldAttribute::Placeholder);
        }
        if helper_text.is_some() {
            clear.remove(&FieldAttribute::HelperText);
        }
        if default_value.is_some() {
            clear.remove(&FieldAttribute::DefaultValue);
        }
        if options.is_some() {
            clear.remove(&FieldAttribute::Options);
        }
        if allow_multi_select.is_some() {
            clear.remove(&FieldAttribute::AllowMultiSelect);
        }

        FieldPatch {
            name: later.name.or(self.name),
            label: later.label.or(self.label),
            placeholder,
            helper_text,
            default_value,
            options,
            width: later.width.or(self.width),
            allow_multi_select,
            required: later.required.or(self.required),
            validation: later.validation.or(self.validation),
            clear,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == FieldPatch::default()
    }

    pub fn apply_to(&self, field: &mut FieldEntity) {
        for attribute in &self.clear {
            match attribute {
                FieldAttribute::Placeholder => field.placeholder = None,
                FieldAttribute::HelperText => field.helper_text = None,
                FieldAttribute::DefaultValue => field.default_value = None,
                FieldAttribute::Options => field.options = None,
                FieldAttribute::AllowMultiSelect => field.allow_multi_select = None,
            }
        }
        if let Some(name) = &self.name {
            field.name = name.clone();
        }
        if let Some(label) = &self.label {
            field.label = label.clone();
        }
        if let Some(placeholder) = &self.placeholder {
            field.placeholder = Some(placeholder.clone());
        }
        if let Some(helper_text) = &self.helper_text {
            field.helper_text = Some(helper_text.clone());
        }
        if let Some(default_value) = &self.default_value {
            field.default_value = Some(default_value.clone());
        }
        if let Some(options) = &self.options {
            field.options = Some(options.clone());
        }
        if let Some(width) = self.width {
            field.width = width;
        }
        if let Some(multi) = self.allow_multi_select {
            field.allow_multi_select = Some(multi);
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(validation) = &self.validation {
            field.validation = validation.clone();
        }
    }
}

fn unless_cleared<T>(
    earlier: Option<T>,
    cleared: &BTreeSet<FieldAttribute>,
    attribute: FieldAttribute,
) -> Option<T> {
    if cleared.contains(&attribute) {
        None
    } else {
        earlier
    }
}
