//! Value functions turn a narrowed selection into the literal handed to a
//! scalar.
//!
//! The function is picked from slot 1 of the annotation:
//! - `[name]` reads the `name` attribute of the first node; both brackets
//!   are required
//! - `html` serializes the inner markup of the first node
//! - `text`, anything else, or no slot at all reads the trimmed text
//!
//! Resolutions are memoized per raw annotation in a process wide
//! [`ValueFnCache`].

use crate::selection::Selection;
use crate::tag::Tag;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::debug;

/// Rule for extracting a literal from a selection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueFn {
    Text,
    Html,
    Attr(String),
}

impl ValueFn {
    /// Resolve the value function named by slot 1 of `tag`
    pub fn resolve(tag: &Tag) -> Self {
        let source = tag.selector(1);

        if source.is_empty() {
            return ValueFn::Text;
        }

        if let Some(name) = source.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            return ValueFn::Attr(name.to_string());
        }

        match source {
            "html" => ValueFn::Html,
            "text" => ValueFn::Text,
            other => {
                debug!(value_selector = %other, tag = %tag, "Unknown value selector, falling back to text");
                ValueFn::Text
            }
        }
    }

    pub fn extract(&self, selection: &Selection<'_>) -> String {
        match self {
            ValueFn::Text => selection.text().trim().to_string(),
            ValueFn::Html => selection.html().trim().to_string(),
            ValueFn::Attr(name) => selection.attr(name).unwrap_or_default().to_string(),
        }
    }
}

/// Memoized value functions keyed by raw annotation
///
/// Entries are never evicted.
#[derive(Debug, Default)]
pub struct ValueFnCache {
    entries: Mutex<HashMap<String, ValueFn>>,
}

impl ValueFnCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by every decode in the process
    pub fn global() -> &'static ValueFnCache {
        static GLOBAL: OnceLock<ValueFnCache> = OnceLock::new();
        GLOBAL.get_or_init(ValueFnCache::new)
    }

    pub fn resolve(&self, tag: &Tag) -> ValueFn {
        // Entries are inserted whole, so a poisoned map is still consistent
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(value_fn) = entries.get(tag.raw()) {
            return value_fn.clone();
        }

        let value_fn = ValueFn::resolve(tag);
        entries.insert(tag.raw().to_string(), value_fn.clone());
        value_fn
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
