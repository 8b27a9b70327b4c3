//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a lazy handle: it names "the element(s) matching this
//! selector in the current document" and is only resolved when an action or
//! read is performed on it. Nothing here touches the browser.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default timeout for waiting on a locator (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default polling interval while waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "expr", rename_all = "lowercase")]
pub enum Selector {
    /// CSS selector (e.g., "button[type=submit]")
    Css(String),
    /// XPath selector
    XPath(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// The raw selector expression
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }

    /// Narrow the selector to elements whose attribute equals `value`.
    ///
    /// `input[name="gender"]` with `("value", "male")` becomes
    /// `input[name="gender"][value="male"]`.
    #[must_use]
    pub fn with_attribute(&self, name: &str, value: &str) -> Self {
        match self {
            Self::Css(css) => Self::Css(format!("{css}[{name}={}]", css_string(value))),
            Self::XPath(xpath) => Self::XPath(format!("{xpath}[@{name}={}]", xpath_string(value))),
        }
    }

    /// JavaScript expression that evaluates to the first match or `null`
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({})", js_string(s)),
            Self::XPath(s) => format!(
                "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                js_string(s)
            ),
        }
    }

    /// JavaScript expression that evaluates to the number of matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelectorAll({}).length", js_string(s)),
            Self::XPath(s) => format!(
                "document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength",
                js_string(s)
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
        }
    }
}

/// Quote a string as a JavaScript literal.
///
/// JSON string literals are valid JavaScript, so serde_json does the escaping.
#[must_use]
pub fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}

fn css_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// XPath 1.0 has no escapes; a value holding both quote kinds is spliced
/// together with `concat()`.
fn xpath_string(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{value}'")
    } else if !value.contains('"') {
        format!("\"{value}\"")
    } else {
        let parts: Vec<String> = value.split('\'').map(|part| format!("'{part}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// Locator options for waiting behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Timeout for waits performed through this locator
    pub timeout: Duration,
    /// Polling interval while waiting
    pub poll_interval: Duration,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// A lazily-resolved handle to the elements matching a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    options: LocatorOptions,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            options: LocatorOptions::default(),
        }
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set a custom polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval = interval;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }
}

impl From<Selector> for Locator {
    fn from(selector: Selector) -> Self {
        Self::from_selector(selector)
    }
}
