//! Form data model shared by the builder, the registries and the runtime

pub mod field;
pub mod form;

pub use field::{
    ConfigKind, FieldAttribute, FieldEntity, FieldOption, FieldPatch, FieldType, FieldValidation, FieldWidth,
    RuleConfig,
};
pub use form::{FormConfig, PageEntity};
