#![forbid(unsafe_code)]

//! Component identifier to namespace resolution.
//!
//! A component identifier looks like `vendor.name@major.minor.patch`, with
//! anything after the major version ignored. The namespace derived from it is
//! `vendor-name-major-x`, so every patch and minor release of the same major
//! version shares class names.
//!
//! Malformed identifiers resolve to `None`. This is never reported: a
//! component's identifier comes from its host, not from user input.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^.]+)\.([^@]+)@(\d+)").expect("identifier pattern is valid")
});

/// A resolved class-name namespace such as `vtex-app-2-x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Resolve the namespace of a component identifier.
    ///
    /// ```
    /// use css_handles_core::namespace::Namespace;
    ///
    /// let ns = Namespace::resolve("vtex.store-components@3.14.0").unwrap();
    /// assert_eq!(ns.as_str(), "vtex-store-components-3-x");
    /// assert!(Namespace::resolve("not-an-identifier").is_none());
    /// ```
    #[must_use]
    pub fn resolve(identifier: &str) -> Option<Self> {
        let caps = IDENTIFIER_PATTERN.captures(identifier)?;
        let vendor = caps.get(1)?.as_str();
        let name = caps.get(2)?.as_str();
        let major = caps.get(3)?.as_str();
        Some(Self(format!("{vendor}-{name}-{major}-x")))
    }

    /// Fully qualified class for a handle under this namespace.
    #[inline]
    #[must_use]
    pub fn qualify(&self, handle: &str) -> String {
        format!("{}-{handle}", self.0)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the ordered namespace list for a component and its migrations.
///
/// The primary namespace comes first when it resolves. Migration identifiers
/// follow in the given order; unresolvable ones and ones equal to the primary
/// namespace are skipped.
#[must_use]
pub fn namespace_chain<S: AsRef<str>>(component: &str, migration_from: &[S]) -> Vec<Namespace> {
    let primary = Namespace::resolve(component);
    let mut chain = Vec::with_capacity(1 + migration_from.len());
    if let Some(ns) = &primary {
        chain.push(ns.clone());
    }
    chain.extend(
        migration_from
            .iter()
            .filter_map(|id| Namespace::resolve(id.as_ref()))
            .filter(|ns| primary.as_ref() != Some(ns)),
    );
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(id: &str) -> Option<String> {
        Namespace::resolve(id).map(|n| n.as_str().to_owned())
    }

    #[test]
    fn resolves_full_identifier() {
        assert_eq!(ns("vtex.app@2.1.0").as_deref(), Some("vtex-app-2-x"));
    }

    #[test]
    fn ignores_minor_patch_and_trailing_path() {
        assert_eq!(ns("vtex.app@2").as_deref(), Some("vtex-app-2-x"));
        assert_eq!(ns("vtex.app@2.1.0/Foo").as_deref(), Some("vtex-app-2-x"));
        assert_eq!(ns("vtex.app@12.0.0-beta").as_deref(), Some("vtex-app-12-x"));
    }

    #[test]
    fn hyphenated_names_are_kept() {
        assert_eq!(
            ns("vtex.previous-app@3.0.0").as_deref(),
            Some("vtex-previous-app-3-x")
        );
    }

    #[test]
    fn malformed_identifiers_resolve_to_none() {
        assert_eq!(ns(""), None);
        assert_eq!(ns("vtex.app"), None);
        assert_eq!(ns("vtex@1.0.0"), None);
        assert_eq!(ns("vtex.app@x.1.0"), None);
    }

    #[test]
    fn qualify_appends_handle() {
        let ns = Namespace::resolve("vtex.app@2.1.0").unwrap();
        assert_eq!(ns.qualify("container"), "vtex-app-2-x-container");
    }

    #[test]
    fn chain_keeps_order_and_drops_primary_duplicate() {
        let chain = namespace_chain(
            "vtex.app@2.1.0",
            &["vtex.previous-app@2.0.0", "vtex.app@2.9.9", "bogus", "vtex.previous-app@3.0.0"],
        );
        let names: Vec<&str> = chain.iter().map(Namespace::as_str).collect();
        assert_eq!(
            names,
            ["vtex-app-2-x", "vtex-previous-app-2-x", "vtex-previous-app-3-x"]
        );
    }

    #[test]
    fn chain_without_primary_uses_migrations_only() {
        let chain = namespace_chain("", &["vtex.old@1.0.0"]);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].as_str(), "vtex-old-1-x");
    }

    #[test]
    fn chain_with_nothing_is_empty() {
        let none: [&str; 0] = [];
        assert!(namespace_chain("bad", &none).is_empty());
    }
}
