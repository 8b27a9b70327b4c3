//! Page Object Model support.
//!
//! A page object encapsulates where things are on one page ([`SelectorMap`])
//! and what a user can do there. Scenario code talks to page objects and
//! never to raw selectors.

use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for page objects representing a page or component in the UI.
pub trait PageObject {
    /// Path of this page relative to the application base URL (e.g. "/")
    fn url_path(&self) -> &str;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Absolute URL of this page under `base_url`
    fn page_url(&self, base_url: &str) -> String {
        join_url(base_url, self.url_path())
    }
}

/// Join a base URL and a path without doubling or dropping the slash
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Immutable mapping from logical element keys to selectors.
///
/// Built once through [`SelectorMapBuilder`]; there is no mutation API, so a
/// map can be shared freely between page objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorMap<K: Eq + Hash> {
    entries: HashMap<K, Selector>,
}

impl<K: Eq + Hash + Debug> SelectorMap<K> {
    /// Start building a map
    #[must_use]
    pub fn builder() -> SelectorMapBuilder<K> {
        SelectorMapBuilder {
            entries: HashMap::new(),
        }
    }

    /// Selector for `key`
    pub fn get(&self, key: &K) -> ProbeResult<&Selector> {
        self.entries
            .get(key)
            .ok_or_else(|| ProbeError::MissingSelector {
                key: format!("{key:?}"),
            })
    }

    /// Whether `key` has an entry
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Selector)> {
        self.entries.iter()
    }
}

/// Builder for [`SelectorMap`]
#[derive(Debug, Clone)]
pub struct SelectorMapBuilder<K: Eq + Hash> {
    entries: HashMap<K, Selector>,
}

impl<K: Eq + Hash> SelectorMapBuilder<K> {
    /// Map `key` to `selector`, replacing any earlier entry
    #[must_use]
    pub fn with(mut self, key: K, selector: Selector) -> Self {
        let _ = self.entries.insert(key, selector);
        self
    }

    /// Map `key` to a CSS selector
    #[must_use]
    pub fn with_css(self, key: K, css: &str) -> Self {
        self.with(key, Selector::css(css))
    }

    /// Finish the map
    #[must_use]
    pub fn build(self) -> SelectorMap<K> {
        SelectorMap {
            entries: self.entries,
        }
    }
}
