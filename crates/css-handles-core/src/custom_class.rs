#![forbid(unsafe_code)]

//! Caller-supplied class overrides.
//!
//! An override for one handle is a class name, a class name with options, or
//! a list mixing both. Names may hold several space-separated classes. The
//! same shapes deserialize from JSON props:
//!
//! ```
//! use css_handles_core::custom_class::CustomClassValue;
//!
//! let value: CustomClassValue =
//!     serde_json::from_str(r#"["plain", {"name": "a b", "applyModifiers": true}, null]"#).unwrap();
//! let computed = value.compute();
//! assert_eq!(computed.class_names, ["plain", "a", "b"]);
//! assert_eq!(computed.to_apply_modifiers, ["a", "b"]);
//! ```

use serde::{Deserialize, Deserializer};

/// One entry of an override.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum CustomClassItem {
    /// Class names passed through as-is.
    Name(String),
    /// Class names that may also receive modifiers.
    Options {
        name: String,
        #[serde(default, rename = "applyModifiers")]
        apply_modifiers: bool,
    },
}

impl CustomClassItem {
    /// Class names that also receive modifiers.
    pub fn with_modifiers(name: impl Into<String>) -> Self {
        Self::Options {
            name: name.into(),
            apply_modifiers: true,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Options { name, .. } => name,
        }
    }

    fn applies_modifiers(&self) -> bool {
        matches!(
            self,
            Self::Options {
                apply_modifiers: true,
                ..
            }
        )
    }
}

impl From<&str> for CustomClassItem {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for CustomClassItem {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Override value for one handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum CustomClassValue {
    One(CustomClassItem),
    Many(#[serde(deserialize_with = "skip_null_items")] Vec<CustomClassItem>),
}

fn skip_null_items<'de, D>(deserializer: D) -> Result<Vec<CustomClassItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Option<CustomClassItem>>::deserialize(deserializer)?;
    Ok(items.into_iter().flatten().collect())
}

impl CustomClassValue {
    /// Flatten into class tokens and the modifier-eligible subset.
    ///
    /// Token order follows entry order, then word order within a name.
    /// Repeated tokens are kept.
    #[must_use]
    pub fn compute(&self) -> ComputedCustomClass {
        let items = match self {
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items.as_slice(),
        };
        let mut computed = ComputedCustomClass::default();
        for item in items {
            let eligible = item.applies_modifiers();
            for token in item.name().split_whitespace() {
                computed.class_names.push(token.to_owned());
                if eligible {
                    computed.to_apply_modifiers.push(token.to_owned());
                }
            }
        }
        computed
    }
}

impl From<CustomClassItem> for CustomClassValue {
    fn from(item: CustomClassItem) -> Self {
        Self::One(item)
    }
}

impl From<&str> for CustomClassValue {
    fn from(name: &str) -> Self {
        Self::One(name.into())
    }
}

impl From<String> for CustomClassValue {
    fn from(name: String) -> Self {
        Self::One(name.into())
    }
}

impl From<Vec<CustomClassItem>> for CustomClassValue {
    fn from(items: Vec<CustomClassItem>) -> Self {
        Self::Many(items)
    }
}

/// Flattened override for one handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedCustomClass {
    /// Every class token, in order.
    pub class_names: Vec<String>,
    /// Tokens that receive `--modifier` variants; a subset of `class_names`.
    pub to_apply_modifiers: Vec<String>,
}

impl ComputedCustomClass {
    /// Class string rendered for the handle.
    #[must_use]
    pub fn class_string(&self) -> String {
        self.class_names.join(" ")
    }
}
