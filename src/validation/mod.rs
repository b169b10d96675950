//! Validation rules, their registry and the composer that turns a field's
//! rule configuration into runtime checks

pub mod builtin;
pub mod composer;
pub mod registry;
pub mod rule;

pub use composer::{
    CompiledValidator, Predicate, ValidationComposer, ValidationFailure, ValidatorOrigin,
    ValidatorSet,
};
pub use registry::ValidationRuleRegistry;
pub use rule::{RuleCategory, RuleDefBuilder, RuleKind, RuleValidator, ValidationRuleDefinition};
