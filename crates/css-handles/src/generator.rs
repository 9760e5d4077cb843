#![forbid(unsafe_code)]

//! Handle generation.
//!
//! Maps a component's logical handle names to namespaced class strings,
//! honoring caller overrides, migration namespaces, and a per-instance block
//! class.
//!
//! # Algorithm
//!
//! 1. Resolve the namespace chain: primary identifier first, then each
//!    migration identifier in order, skipping unresolvable ones and repeats of
//!    the primary.
//! 2. Handles with an override render the override's class tokens and nothing
//!    else.
//! 3. Every other handle renders `<ns>-<handle>` for each namespace in the
//!    chain (plus its `--<blockClass>` variant), space-joined in chain order.
//! 4. [`HandlesBag::with_modifiers`] expands generated handles on every token
//!    and overridden handles only on their modifier-eligible tokens.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Malformed identifier | Namespace skipped silently |
//! | Invalid handle name | `""`, one error event naming the handle |
//! | No namespace at all | Generated handles map to `""` |
//! | Plain override map in development | [`HandlesError::UnverifiedClasses`] |
//!
//! Every declared handle always gets an entry.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use css_handles_core::config::BuildMode;
use css_handles_core::custom_class::ComputedCustomClass;
use css_handles_core::diagnostics::ModifierDiagnostics;
use css_handles_core::modifier::{
    ModifierInput, apply_modifiers_with, expand_tokens, join_classes, report_invalid_call,
};
use css_handles_core::namespace::{Namespace, namespace_chain};
use regex::Regex;

use crate::block_class::InstanceProps;
use crate::classes::ClassesOverride;
use crate::{HandlesError, Result};

static VALID_HANDLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_-][A-Za-z0-9_-]*$").expect("handle pattern is valid")
});

/// Whether `handle` may be used as a class suffix: letters, digits, `-` and
/// `_`, not starting with a digit.
#[inline]
pub fn is_valid_handle(handle: &str) -> bool {
    VALID_HANDLE.is_match(handle)
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Per-call generation options.
#[derive(Debug, Clone, Default)]
pub struct HandlesOptions {
    /// Legacy identifiers whose namespaces are emitted after the primary one.
    pub migration_from: Vec<String>,
    /// Per-handle overrides.
    pub classes: Option<ClassesOverride>,
    /// Per-instance identity applied as a modifier on generated handles.
    pub block_class: Option<String>,
}

impl HandlesOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options seeded with the block class resolved from instance props.
    #[must_use]
    pub fn from_props(props: &InstanceProps) -> Self {
        Self {
            block_class: props.block_class().map(str::to_owned),
            ..Self::default()
        }
    }

    /// Add one migration identifier.
    #[must_use]
    pub fn migration_from(mut self, identifier: impl Into<String>) -> Self {
        self.migration_from.push(identifier.into());
        self
    }

    /// Add several migration identifiers, in order.
    #[must_use]
    pub fn migrations_from<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.migration_from
            .extend(identifiers.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn classes(mut self, classes: impl Into<ClassesOverride>) -> Self {
        self.classes = Some(classes.into());
        self
    }

    #[must_use]
    pub fn block_class(mut self, block_class: impl Into<String>) -> Self {
        self.block_class = Some(block_class.into());
        self
    }

    /// Block class if set and non-empty.
    pub(crate) fn effective_block_class(&self) -> Option<&str> {
        self.block_class.as_deref().filter(|bc| !bc.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Configuration for a [`HandleGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Gates override provenance checks.
    pub mode: BuildMode,
    /// Sink for invalid modifier values.
    pub diagnostics: Arc<ModifierDiagnostics>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mode: BuildMode::from_env(),
            diagnostics: ModifierDiagnostics::shared(),
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<ModifierDiagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// Stateless handle generator; equal inputs always produce equal bags.
#[derive(Debug, Clone, Default)]
pub struct HandleGenerator {
    config: GeneratorConfig,
}

impl HandleGenerator {
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate class strings for `handle_names` under `component`.
    ///
    /// Repeated handle names are generated once. Drains an elapsed modifier
    /// report first; hosts still poll [`ModifierDiagnostics::tick`] to catch
    /// the last window when no further calls arrive.
    pub fn generate<S: AsRef<str>>(
        &self,
        handle_names: &[S],
        component: &str,
        options: &HandlesOptions,
    ) -> Result<HandlesBag> {
        self.config.diagnostics.tick();
        if let Some(classes) = &options.classes
            && self.config.mode.is_development()
            && !classes.is_verified()
        {
            return Err(HandlesError::UnverifiedClasses);
        }

        let namespaces = namespace_chain(component, &options.migration_from);
        let block_class = options.effective_block_class();
        let mut seen = HashSet::with_capacity(handle_names.len());
        let mut entries = Vec::with_capacity(handle_names.len());

        for name in handle_names {
            let name: &str = name.as_ref();
            if !seen.insert(name) {
                continue;
            }
            let custom = options
                .classes
                .as_ref()
                .and_then(|classes| classes.get(name))
                .map(|value| value.compute());
            let classes = match &custom {
                Some(custom) => custom.class_string(),
                None => self.generated_classes(name, &namespaces, block_class),
            };
            entries.push(HandleEntry {
                name: name.to_owned(),
                classes,
                custom,
            });
        }

        tracing::trace!(
            target: "css_handles.handle",
            component,
            namespaces = namespaces.len(),
            handles = entries.len(),
            "handles generated"
        );

        Ok(HandlesBag {
            entries,
            diagnostics: Arc::clone(&self.config.diagnostics),
        })
    }

    fn generated_classes(
        &self,
        handle: &str,
        namespaces: &[Namespace],
        block_class: Option<&str>,
    ) -> String {
        if !is_valid_handle(handle) {
            tracing::error!(
                target: "css_handles.handle",
                handle,
                "Invalid CSS handle \"{handle}\". It should only contain letters, numbers, - or _, and should start with a letter."
            );
            return String::new();
        }
        let segments: Vec<String> = namespaces
            .iter()
            .map(|ns| {
                let qualified = ns.qualify(handle);
                match block_class {
                    Some(bc) => apply_modifiers_with(&qualified, bc, &self.config.diagnostics),
                    None => qualified,
                }
            })
            .collect();
        segments.join(" ")
    }
}

/// Generate handles with the default generator.
pub fn generate<S: AsRef<str>>(
    handle_names: &[S],
    component: &str,
    options: &HandlesOptions,
) -> Result<HandlesBag> {
    HandleGenerator::default().generate(handle_names, component, options)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct HandleEntry {
    name: String,
    classes: String,
    custom: Option<ComputedCustomClass>,
}

/// Result of one generation: class strings per handle plus modifier expansion.
///
/// Invalid modifiers are batched by the generator's [`ModifierDiagnostics`].
/// Each [`with_modifiers`](Self::with_modifiers) call fires a report whose
/// window has elapsed; the final window fires only when the host polls
/// [`ModifierDiagnostics::tick`].
#[derive(Debug, Clone)]
pub struct HandlesBag {
    entries: Vec<HandleEntry>,
    diagnostics: Arc<ModifierDiagnostics>,
}

impl PartialEq for HandlesBag {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for HandlesBag {}

impl HandlesBag {
    fn entry(&self, handle: &str) -> Option<&HandleEntry> {
        self.entries.iter().find(|e| e.name == handle)
    }

    /// Class string for a declared handle.
    pub fn get(&self, handle: &str) -> Option<&str> {
        self.entry(handle).map(|e| e.classes.as_str())
    }

    /// Class string for `handle`, or `""` if it was not declared.
    pub fn handle(&self, handle: &str) -> &str {
        self.get(handle).unwrap_or_default()
    }

    /// Class string of `handle` expanded with `modifiers`.
    ///
    /// Overridden handles keep all their tokens but only modifier-eligible
    /// ones gain `--modifier` variants. Generated handles expand every token.
    /// An invalid modifier argument is reported and the plain class string is
    /// returned.
    pub fn with_modifiers(&self, handle: &str, modifiers: impl Into<ModifierInput>) -> String {
        self.diagnostics.tick();
        let input = modifiers.into();
        let Some(list) = input.normalize() else {
            report_invalid_call(&input);
            return self.handle(handle).to_owned();
        };
        let Some(entry) = self.entry(handle) else {
            return String::new();
        };
        match &entry.custom {
            Some(custom) => {
                let groups = expand_tokens(&custom.to_apply_modifiers, list, &self.diagnostics);
                join_classes(&custom.class_names, &groups)
            }
            None => {
                let tokens: Vec<&str> = entry.classes.split_whitespace().collect();
                let groups = expand_tokens(&tokens, list, &self.diagnostics);
                join_classes(&tokens, &groups)
            }
        }
    }

    /// `(handle, classes)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.classes.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// All non-empty handle strings joined, as rendered on a single node.
    #[must_use]
    pub fn class_list(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.classes.as_str())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `handle` renders a caller override.
    pub fn is_overridden(&self, handle: &str) -> bool {
        self.entry(handle).is_some_and(|e| e.custom.is_some())
    }
}
