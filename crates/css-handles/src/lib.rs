#![forbid(unsafe_code)]

//! css-handles public facade.
//!
//! Generates deterministic, namespaced CSS class names ("handles") for
//! components identified as `vendor.name@major.minor.patch`, with caller
//! overrides, BEM-style modifiers, and legacy namespaces kept alive during
//! renames.
//!
//! ```
//! use css_handles::prelude::*;
//!
//! let bag = generate(
//!     &["element1", "element2"],
//!     "vtex.app@2.1.0",
//!     &HandlesOptions::new().block_class("blockClass"),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     bag.handle("element1"),
//!     "vtex-app-2-x-element1 vtex-app-2-x-element1--blockClass"
//! );
//! assert_eq!(
//!     bag.with_modifiers("element2", "active"),
//!     "vtex-app-2-x-element2 vtex-app-2-x-element2--blockClass \
//!      vtex-app-2-x-element2--active vtex-app-2-x-element2--blockClass--active"
//! );
//! ```

use std::fmt;

pub mod block_class;
pub mod classes;
pub mod generator;
pub mod memo;

// --- Core re-exports -------------------------------------------------------

pub use css_handles_core::config::{BuildMode, DEFAULT_FLUSH_DELAY, DiagnosticsConfig, MODE_ENV_VAR};
pub use css_handles_core::custom_class::{ComputedCustomClass, CustomClassItem, CustomClassValue};
pub use css_handles_core::diagnostics::{ModifierDiagnostics, ModifierReport};
pub use css_handles_core::modifier::{
    ModifierInput, apply_modifiers, apply_modifiers_with, validate_modifier,
};
pub use css_handles_core::namespace::Namespace;

// --- Facade re-exports -----------------------------------------------------

pub use block_class::{InstanceProps, generate_block_class};
pub use classes::{ClassesId, ClassesOverride, CustomClasses, CustomClassesBuilder, CustomClassesMemo};
pub use generator::{
    GeneratorConfig, HandleGenerator, HandlesBag, HandlesOptions, generate, is_valid_handle,
};
pub use memo::HandlesMemo;

// --- Errors ---------------------------------------------------------------

/// Errors that stop handle generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlesError {
    /// A hand-built override map was passed in development mode.
    UnverifiedClasses,
}

impl fmt::Display for HandlesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnverifiedClasses => write!(
                f,
                "[css-handles] Invalid 'classes' option. Use `CustomClasses` or `CustomClassesMemo` to build a valid 'classes' value."
            ),
        }
    }
}

impl std::error::Error for HandlesError {}

/// Standard result type for css-handles APIs.
pub type Result<T> = std::result::Result<T, HandlesError>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BuildMode, CustomClassItem, CustomClassValue, CustomClasses, CustomClassesMemo,
        HandleGenerator, HandlesBag, HandlesError, HandlesMemo, HandlesOptions, InstanceProps,
        ModifierDiagnostics, Result, generate,
    };
}
