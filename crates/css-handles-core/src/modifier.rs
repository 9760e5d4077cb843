#![forbid(unsafe_code)]

//! Modifier validation and BEM-style expansion.
//!
//! A modifier `m` applied to class `c` yields the extra class `c--m`.
//! Applying modifiers to a multi-token base expands every token:
//!
//! ```
//! use css_handles_core::modifier::apply_modifiers_with;
//! use css_handles_core::diagnostics::ModifierDiagnostics;
//!
//! let diagnostics = ModifierDiagnostics::default();
//! let out = apply_modifiers_with("h h--bc", "active", &diagnostics);
//! assert_eq!(out, "h h--bc h--active h--bc--active");
//! ```
//!
//! Invalid modifiers contribute nothing and are reported through
//! [`ModifierDiagnostics`]; they never abort the rest of the expansion.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::diagnostics::ModifierDiagnostics;

static INVALID_MODIFIER_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9-]").expect("modifier pattern is valid"));

/// Modifier argument as received from rendering glue.
///
/// Glue code may hand over anything, so the argument is kept as a JSON value
/// until it is normalized: a string is one modifier, an array is a list of
/// modifiers, and any other shape is an invalid call.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierInput(Value);

impl ModifierInput {
    /// Normalize to a list of modifier values.
    ///
    /// Returns `None` when the input is neither a string nor an array.
    pub fn normalize(&self) -> Option<&[Value]> {
        match &self.0 {
            Value::String(_) => Some(std::slice::from_ref(&self.0)),
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for ModifierInput {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for ModifierInput {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_owned()))
    }
}

impl From<String> for ModifierInput {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

impl From<&String> for ModifierInput {
    fn from(value: &String) -> Self {
        Self(Value::String(value.clone()))
    }
}

impl<S: AsRef<str>> From<&[S]> for ModifierInput {
    fn from(values: &[S]) -> Self {
        Self(Value::Array(
            values
                .iter()
                .map(|v| {
                    let text: &str = v.as_ref();
                    Value::String(text.to_owned())
                })
                .collect(),
        ))
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for ModifierInput {
    fn from(values: [S; N]) -> Self {
        Self::from(&values[..])
    }
}

impl<S: AsRef<str>, const N: usize> From<&[S; N]> for ModifierInput {
    fn from(values: &[S; N]) -> Self {
        Self::from(&values[..])
    }
}

impl<S: AsRef<str>> From<Vec<S>> for ModifierInput {
    fn from(values: Vec<S>) -> Self {
        Self::from(values.as_slice())
    }
}

/// Check one modifier value, recording rejections for the coalesced report.
///
/// Non-strings and strings with characters outside `[A-Za-z0-9-]` are
/// recorded. The empty string means "no modifier": it is rejected silently.
pub fn validate_modifier(modifier: &Value, diagnostics: &ModifierDiagnostics) -> bool {
    let Value::String(text) = modifier else {
        diagnostics.record(modifier.to_string());
        return false;
    };
    if text.is_empty() {
        return false;
    }
    if INVALID_MODIFIER_CHAR.is_match(text) {
        diagnostics.record(text.as_str());
        return false;
    }
    true
}

/// Suffix every eligible token with every valid modifier.
///
/// Returns one space-joined group per valid modifier, in modifier order.
/// Invalid modifiers produce no group.
pub fn expand_tokens<S: AsRef<str>>(
    eligible: &[S],
    modifiers: &[Value],
    diagnostics: &ModifierDiagnostics,
) -> Vec<String> {
    modifiers
        .iter()
        .filter(|m| validate_modifier(m, diagnostics))
        .filter_map(Value::as_str)
        .map(|modifier| {
            eligible
                .iter()
                .map(|token| {
                    let token: &str = token.as_ref();
                    format!("{token}--{modifier}")
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|group| !group.is_empty())
        .collect()
}

/// Join base tokens and modifier groups into one single-spaced class string.
pub fn join_classes<S: AsRef<str>>(base: &[S], groups: &[String]) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    for part in base {
        let part: &str = part.as_ref();
        tokens.extend(part.split_whitespace());
    }
    for group in groups {
        tokens.extend(group.split_whitespace());
    }
    tokens.join(" ")
}

/// Report a modifier argument that is neither a string nor a list.
pub fn report_invalid_call(input: &ModifierInput) {
    tracing::error!(
        target: "css_handles.modifier",
        input = %input.as_value(),
        "Invalid modifier type on `withModifiers`. Please use either a string or an array of strings"
    );
}

/// Expand `base` with `modifiers`, reporting through the shared diagnostics.
pub fn apply_modifiers(base: &str, modifiers: impl Into<ModifierInput>) -> String {
    apply_modifiers_with(base, modifiers, &ModifierDiagnostics::shared())
}

/// Expand `base` with `modifiers`, reporting through `diagnostics`.
///
/// The output is the base tokens followed by `token--modifier` for every
/// valid modifier and every base token. An invalid call shape returns `base`
/// untouched. A report whose window already elapsed fires before the new
/// input is checked.
pub fn apply_modifiers_with(
    base: &str,
    modifiers: impl Into<ModifierInput>,
    diagnostics: &ModifierDiagnostics,
) -> String {
    diagnostics.tick();
    let input = modifiers.into();
    let Some(list) = input.normalize() else {
        report_invalid_call(&input);
        return base.to_owned();
    };
    let tokens: Vec<&str> = base.split_whitespace().collect();
    let groups = expand_tokens(&tokens, list, diagnostics);
    join_classes(&tokens, &groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildMode, DiagnosticsConfig};
    use serde_json::json;

    const HANDLE: &str = "vtex-app-2-x-handle vtex-app-2-x-handle--blockClass";

    fn dev() -> ModifierDiagnostics {
        ModifierDiagnostics::new(DiagnosticsConfig::default().with_mode(BuildMode::Development))
    }

    #[test]
    fn single_modifier() {
        let d = dev();
        assert_eq!(
            apply_modifiers_with(HANDLE, "test", &d),
            "vtex-app-2-x-handle vtex-app-2-x-handle--blockClass vtex-app-2-x-handle--test vtex-app-2-x-handle--blockClass--test"
        );
    }

    #[test]
    fn multiple_modifiers_keep_order() {
        let d = dev();
        assert_eq!(
            apply_modifiers_with(HANDLE, ["test", "test2"], &d),
            "vtex-app-2-x-handle vtex-app-2-x-handle--blockClass vtex-app-2-x-handle--test vtex-app-2-x-handle--blockClass--test vtex-app-2-x-handle--test2 vtex-app-2-x-handle--blockClass--test2"
        );
    }

    #[test]
    fn non_string_non_list_returns_base() {
        let d = dev();
        assert_eq!(apply_modifiers_with(HANDLE, json!(0), &d), HANDLE);
        assert!(!d.has_pending());
    }

    #[test]
    fn non_string_list_members_are_skipped_and_recorded() {
        let d = dev();
        assert_eq!(
            apply_modifiers_with(HANDLE, json!(["test", 0, null]), &d),
            "vtex-app-2-x-handle vtex-app-2-x-handle--blockClass vtex-app-2-x-handle--test vtex-app-2-x-handle--blockClass--test"
        );
        assert_eq!(d.pending(), ["0", "null"]);
    }

    #[test]
    fn empty_modifier_is_silent() {
        let d = dev();
        assert_eq!(apply_modifiers_with("a", "", &d), "a");
        assert!(!d.has_pending());
    }

    #[test]
    fn disallowed_characters_are_recorded() {
        let d = dev();
        assert_eq!(apply_modifiers_with("a", ["ok", "not ok", "x_y"], &d), "a a--ok");
        assert_eq!(d.pending(), ["not ok", "x_y"]);
    }

    #[test]
    fn irregular_whitespace_is_normalized() {
        let d = dev();
        assert_eq!(apply_modifiers_with("  a   b ", "m", &d), "a b a--m b--m");
    }

    #[test]
    fn empty_base_stays_empty() {
        let d = dev();
        assert_eq!(apply_modifiers_with("", ["m", "n"], &d), "");
    }

    #[test]
    fn validate_rules() {
        let d = dev();
        assert!(validate_modifier(&json!("active"), &d));
        assert!(validate_modifier(&json!("is-2x"), &d));
        assert!(!validate_modifier(&json!(""), &d));
        assert!(!validate_modifier(&json!(true), &d));
        assert!(!validate_modifier(&json!("é"), &d));
        assert_eq!(d.pending(), ["true", "é"]);
    }
}
