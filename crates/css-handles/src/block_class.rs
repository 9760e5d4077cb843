#![forbid(unsafe_code)]

//! Per-instance block class helpers.

/// Instance props a host passes down to a component.
///
/// `css_handle` is the newer name for the same per-instance identity and wins
/// over `block_class` when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceProps {
    pub css_handle: Option<String>,
    pub block_class: Option<String>,
}

impl InstanceProps {
    /// Effective block class, if any non-empty one was supplied.
    pub fn block_class(&self) -> Option<&str> {
        [&self.css_handle, &self.block_class]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|value| !value.is_empty())
    }
}

/// Append a `--block` variant of `base` for the first word of `block_class`.
///
/// ```
/// use css_handles::block_class::generate_block_class;
///
/// assert_eq!(generate_block_class("shelf", "home extra"), "shelf shelf--home");
/// assert_eq!(generate_block_class("shelf", ""), "shelf");
/// ```
#[must_use]
pub fn generate_block_class(base: &str, block_class: &str) -> String {
    match block_class.split(' ').next() {
        Some(first) if !block_class.is_empty() => format!("{base} {base}--{first}"),
        _ => base.to_owned(),
    }
}
