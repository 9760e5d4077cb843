#![forbid(unsafe_code)]

//! Single-slot generation cache.
//!
//! A component regenerates its handles only when one of its inputs changes:
//! handle names, component identifier, block class, migration identifiers, or
//! the identity of its verified override bag. [`HandlesMemo`] keeps the last
//! result for the last key and hands out shared references to it.
//!
//! ```
//! use css_handles::generator::HandlesOptions;
//! use css_handles::memo::HandlesMemo;
//!
//! let mut memo = HandlesMemo::default();
//! let options = HandlesOptions::new().block_class("home");
//! let first = memo.get_or_generate(&["root"], "vtex.app@2.1.0", &options).unwrap();
//! let again = memo.get_or_generate(&["root"], "vtex.app@2.1.0", &options).unwrap();
//! assert!(std::sync::Arc::ptr_eq(&first, &again));
//! assert_eq!(memo.generation_count(), 1);
//! ```

use std::sync::Arc;

use crate::Result;
use crate::classes::ClassesId;
use crate::generator::{HandleGenerator, HandlesBag, HandlesOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoKey {
    handles: Vec<String>,
    component: String,
    block_class: Option<String>,
    migration_from: Vec<String>,
    classes: Option<ClassesId>,
}

impl MemoKey {
    /// `None` when the inputs carry a plain override map, which has no
    /// identity to key on.
    fn new<S: AsRef<str>>(
        handles: &[S],
        component: &str,
        options: &HandlesOptions,
    ) -> Option<Self> {
        let classes = match &options.classes {
            Some(classes) => Some(classes.id()?),
            None => None,
        };
        Some(Self {
            handles: handles.iter().map(owned).collect(),
            component: component.to_owned(),
            block_class: options.effective_block_class().map(str::to_owned),
            migration_from: options.migration_from.clone(),
            classes,
        })
    }

    fn matches<S: AsRef<str>>(
        &self,
        handles: &[S],
        component: &str,
        options: &HandlesOptions,
    ) -> bool {
        let classes = match &options.classes {
            Some(classes) => match classes.id() {
                Some(id) => Some(id),
                // Plain maps have no identity to match.
                None => return false,
            },
            None => None,
        };
        self.component == component
            && self.block_class.as_deref() == options.effective_block_class()
            && self.migration_from == options.migration_from
            && self.classes == classes
            && self.handles.len() == handles.len()
            && self
                .handles
                .iter()
                .zip(handles)
                .all(|(cached, h)| {
                    let h: &str = h.as_ref();
                    cached.as_str() == h
                })
    }
}

fn owned<S: AsRef<str>>(handle: &S) -> String {
    handle.as_ref().to_owned()
}

/// Memoized [`HandleGenerator`].
#[derive(Debug, Default)]
pub struct HandlesMemo {
    generator: HandleGenerator,
    slot: Option<(MemoKey, Arc<HandlesBag>)>,
    generations: u64,
}

impl HandlesMemo {
    #[must_use]
    pub fn new(generator: HandleGenerator) -> Self {
        Self {
            generator,
            slot: None,
            generations: 0,
        }
    }

    /// Return the cached bag when inputs match the last call, else regenerate.
    ///
    /// Errors are not cached.
    pub fn get_or_generate<S: AsRef<str>>(
        &mut self,
        handles: &[S],
        component: &str,
        options: &HandlesOptions,
    ) -> Result<Arc<HandlesBag>> {
        if let Some((key, bag)) = &self.slot
            && key.matches(handles, component, options)
        {
            tracing::trace!(target: "css_handles.cache", component, "handles cache hit");
            return Ok(Arc::clone(bag));
        }

        let bag = Arc::new(self.generator.generate(handles, component, options)?);
        self.generations += 1;

        match MemoKey::new(handles, component, options) {
            Some(key) => {
                tracing::debug!(
                    target: "css_handles.cache",
                    component,
                    generations = self.generations,
                    "handles regenerated"
                );
                self.slot = Some((key, Arc::clone(&bag)));
            }
            None => {
                tracing::debug!(
                    target: "css_handles.cache",
                    component,
                    "plain classes override is not cacheable"
                );
                self.slot = None;
            }
        }
        Ok(bag)
    }

    /// Drop the cached result; the next call regenerates.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Number of generations performed, cache misses included, errors excluded.
    pub fn generation_count(&self) -> u64 {
        self.generations
    }

    pub fn generator(&self) -> &HandleGenerator {
        &self.generator
    }
}
