#![forbid(unsafe_code)]

//! Core: namespace resolution, modifier expansion, override flattening, and
//! coalesced diagnostics.

pub mod config;
pub mod custom_class;
pub mod diagnostics;
pub mod modifier;
pub mod namespace;

pub use config::{BuildMode, DiagnosticsConfig};
pub use custom_class::{ComputedCustomClass, CustomClassItem, CustomClassValue};
pub use diagnostics::{ModifierDiagnostics, ModifierReport};
pub use modifier::{ModifierInput, apply_modifiers, apply_modifiers_with, validate_modifier};
pub use namespace::{Namespace, namespace_chain};
