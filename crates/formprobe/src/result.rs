//! Result and error types for Formprobe.

use thiserror::Error;

/// Result type for Formprobe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving the form under test
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Navigation failed or exceeded the navigation timeout
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A waited-for condition never became true
    #[error("Timed out after {ms}ms waiting for {selector}")]
    Timeout {
        /// Selector that was waited on
        selector: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// An immediate read or action found no matching element
    #[error("No element matches {selector}")]
    ElementNotFound {
        /// Selector that matched nothing
        selector: String,
    },

    /// Element exists but cannot accept input
    #[error("Element {selector} is not editable: {reason}")]
    NotEditable {
        /// Selector of the element
        selector: String,
        /// Why the element rejected input
        reason: String,
    },

    /// Element exists but cannot be clicked or checked
    #[error("Element {selector} is not interactable: {reason}")]
    NotInteractable {
        /// Selector of the element
        selector: String,
        /// Why the element rejected the action
        reason: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Session-level failure (CDP command, closed page)
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// The selector map has no entry for a key
    #[error("Selector map has no entry for {key}")]
    MissingSelector {
        /// Key that was looked up
        key: String,
    },

    /// Scenario expectation not met
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Invalid configuration or fixtures
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ProbeError {
    /// Create an element-not-found error
    #[must_use]
    pub fn not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Create a session error
    #[must_use]
    pub fn session(message: impl ToString) -> Self {
        Self::Session {
            message: message.to_string(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is a wait timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether this error came from a failed scenario expectation
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::AssertionFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_names_selector_and_budget() {
        let err = ProbeError::Timeout {
            selector: ".error-message".to_string(),
            ms: 5000,
        };
        let text = err.to_string();
        assert!(text.contains(".error-message"));
        assert!(text.contains("5000ms"));
        assert!(err.is_timeout());
    }

    #[test]
    fn test_timeout_display_fits_load_waits() {
        let err = ProbeError::Timeout {
            selector: "load of http://localhost:3000/".to_string(),
            ms: 30_000,
        };
        assert_eq!(
            err.to_string(),
            "Timed out after 30000ms waiting for load of http://localhost:3000/"
        );
    }

    #[test]
    fn test_not_found_helper() {
        let err = ProbeError::not_found("#firstName");
        assert_eq!(err.to_string(), "No element matches #firstName");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_assertion_helper() {
        let err = ProbeError::assertion("expected a, got b");
        assert!(err.is_assertion());
        assert_eq!(err.to_string(), "Assertion failed: expected a, got b");
    }

    #[test]
    fn test_yaml_conversion() {
        let parse: Result<u32, _> = serde_yaml_ng::from_str("not: [a number");
        let err: ProbeError = parse.unwrap_err().into();
        assert!(matches!(err, ProbeError::Yaml(_)));
    }
}
