//! Field type and validation rule registries for a no-code form builder,
//! plus the pieces that consume them: validator composition, drag and drop
//! reordering, the debounced builder editor and the filling runtime.

pub mod config;
pub mod editor;
pub mod engine;
pub mod model;
pub mod registrations;
pub mod registry;
pub mod reorder;
pub mod runtime;
pub mod validation;

pub use config::EngineConfig;
pub use editor::FormEditor;
pub use engine::FormEngine;
pub use runtime::FormRuntime;
