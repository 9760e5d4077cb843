#![forbid(unsafe_code)]

//! Verified override bags.
//!
//! Handle overrides must come from [`CustomClasses`], whose identity is minted
//! once per construction. The generation cache keys on that identity, so a
//! caller rebuilding an equal map on every frame would defeat it; the memo
//! below is the supported way to rebuild only when inputs change.
//!
//! ```
//! use css_handles::classes::CustomClassesMemo;
//!
//! let mut memo = CustomClassesMemo::new();
//! let a = memo.resolve("dark", || [("root", "theme-dark")]);
//! let b = memo.resolve("dark", || [("root", "theme-dark")]);
//! assert_eq!(a.id(), b.id());
//!
//! let c = memo.resolve("light", || [("root", "theme-light")]);
//! assert_ne!(a.id(), c.id());
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use css_handles_core::custom_class::CustomClassValue;

static NEXT_CLASSES_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one [`CustomClasses`] construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassesId(u64);

impl ClassesId {
    fn next() -> Self {
        Self(NEXT_CLASSES_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Verified per-handle override map.
///
/// Clones share both the entries and the identity. Two bags built separately
/// from equal maps are *not* equal.
#[derive(Debug, Clone)]
pub struct CustomClasses {
    id: ClassesId,
    entries: Arc<HashMap<String, CustomClassValue>>,
}

impl CustomClasses {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CustomClassValue>,
    {
        Self::from_map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn from_map(entries: HashMap<String, CustomClassValue>) -> Self {
        Self {
            id: ClassesId::next(),
            entries: Arc::new(entries),
        }
    }

    #[must_use]
    pub fn builder() -> CustomClassesBuilder {
        CustomClassesBuilder::default()
    }

    /// Parse an override map from JSON props, e.g.
    /// `{"container": "potato", "item": {"name": "item", "applyModifiers": true}}`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<HashMap<String, CustomClassValue>>(json).map(Self::from_map)
    }

    #[inline]
    pub fn id(&self) -> ClassesId {
        self.id
    }

    pub fn get(&self, handle: &str) -> Option<&CustomClassValue> {
        self.entries.get(handle)
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.entries.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CustomClassValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for CustomClasses {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CustomClasses {}

/// Incremental constructor for [`CustomClasses`].
#[derive(Debug, Default)]
pub struct CustomClassesBuilder {
    entries: HashMap<String, CustomClassValue>,
}

impl CustomClassesBuilder {
    /// Set the override for `handle`, replacing any earlier one.
    #[must_use]
    pub fn class(mut self, handle: impl Into<String>, value: impl Into<CustomClassValue>) -> Self {
        self.entries.insert(handle.into(), value.into());
        self
    }

    #[must_use]
    pub fn build(self) -> CustomClasses {
        CustomClasses::from_map(self.entries)
    }
}

/// Override input accepted by generation options.
#[derive(Debug, Clone)]
pub enum ClassesOverride {
    /// Built through [`CustomClasses`]; cacheable by identity.
    Verified(CustomClasses),
    /// Hand-built map. Rejected in development mode.
    Plain(HashMap<String, CustomClassValue>),
}

impl ClassesOverride {
    pub fn get(&self, handle: &str) -> Option<&CustomClassValue> {
        match self {
            Self::Verified(classes) => classes.get(handle),
            Self::Plain(map) => map.get(handle),
        }
    }

    /// Cache identity; plain maps have none.
    pub fn id(&self) -> Option<ClassesId> {
        match self {
            Self::Verified(classes) => Some(classes.id()),
            Self::Plain(_) => None,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }
}

impl From<CustomClasses> for ClassesOverride {
    fn from(classes: CustomClasses) -> Self {
        Self::Verified(classes)
    }
}

impl From<HashMap<String, CustomClassValue>> for ClassesOverride {
    fn from(map: HashMap<String, CustomClassValue>) -> Self {
        Self::Plain(map)
    }
}

/// Rebuilds a [`CustomClasses`] only when its dependency value changes.
#[derive(Debug)]
pub struct CustomClassesMemo<D> {
    slot: Option<(D, CustomClasses)>,
    builds: u64,
}

impl<D> Default for CustomClassesMemo<D> {
    fn default() -> Self {
        Self {
            slot: None,
            builds: 0,
        }
    }
}

impl<D: PartialEq> CustomClassesMemo<D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached bag for `deps`, running `factory` on a miss.
    pub fn resolve<F, I, K, V>(&mut self, deps: D, factory: F) -> CustomClasses
    where
        F: FnOnce() -> I,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CustomClassValue>,
    {
        if let Some((cached_deps, classes)) = &self.slot
            && *cached_deps == deps
        {
            return classes.clone();
        }
        let classes = CustomClasses::new(factory());
        self.builds += 1;
        tracing::trace!(
            target: "css_handles.classes",
            id = classes.id().get(),
            builds = self.builds,
            "custom classes rebuilt"
        );
        self.slot = Some((deps, classes.clone()));
        classes
    }

    /// Number of times the factory ran.
    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_handles_core::custom_class::CustomClassItem;

    #[test]
    fn separate_constructions_have_distinct_identity() {
        let a = CustomClasses::new([("foo", "bar")]);
        let b = CustomClasses::new([("foo", "bar")]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.get("foo"), b.get("foo"));
    }

    #[test]
    fn builder_replaces_repeated_handles() {
        let classes = CustomClasses::builder()
            .class("container", "potato-container")
            .class("item", CustomClassItem::with_modifiers("item"))
            .class("container", "other")
            .build();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes.get("container"), Some(&CustomClassValue::from("other")));
    }

    #[test]
    fn from_json_reads_props() {
        let classes = CustomClasses::from_json(
            r#"{"container": "potato-container", "wrapper": [{"name": "wrapper"}, "wrapper--potato"], "item": {"name": "item"}}"#,
        )
        .unwrap();
        assert_eq!(classes.len(), 3);
        assert!(classes.contains("wrapper"));
        assert!(CustomClasses::from_json("[1, 2]").is_err());
    }

    #[test]
    fn memo_runs_factory_once_per_deps() {
        let mut memo = CustomClassesMemo::new();
        let mut calls = 0;
        let first = memo.resolve(1, || {
            calls += 1;
            [("root", "a")]
        });
        let again = memo.resolve(1, || {
            calls += 1;
            [("root", "a")]
        });
        assert_eq!(calls, 1);
        assert_eq!(first.id(), again.id());

        let changed = memo.resolve(2, || [("root", "b")]);
        assert_ne!(first.id(), changed.id());
        assert_eq!(memo.builds(), 2);

        memo.clear();
        let rebuilt = memo.resolve(2, || [("root", "b")]);
        assert_ne!(changed.id(), rebuilt.id());
    }

    #[test]
    fn override_identity() {
        let verified = ClassesOverride::from(CustomClasses::new([("a", "b")]));
        assert!(verified.is_verified());
        assert!(verified.id().is_some());

        let plain = ClassesOverride::from(HashMap::from([(
            "a".to_owned(),
            CustomClassValue::from("b"),
        )]));
        assert!(!plain.is_verified());
        assert_eq!(plain.id(), None);
        assert_eq!(plain.get("a"), Some(&CustomClassValue::from("b")));
    }
}
