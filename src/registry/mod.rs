//! Field type registry
//!
//! The registry provides:
//! - A catalog of categories for grouping field types
//! - Registration and lookup of field type definitions
//! - Self-describing metadata for the builder UI
//! - Synchronous change notification for dependent views

pub mod builder;
pub mod category;
pub mod field_types;
pub mod types;

pub use builder::FieldTypeDefBuilder;
pub use category::{CategoryCatalog, FieldCategory};
pub use field_types::{FieldTypeRegistry, Listener, ListenerId};
pub use types::{
    ComponentDescriptor, CustomizationInput, CustomizationOption, FieldDefaults,
    FieldTypeDefinition, RegisterOptions, RegisterOutcome, RegistryEvent,
};
