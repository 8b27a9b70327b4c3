//! ProbeDriver - the browser automation seam.
//!
//! Everything engine-specific lives behind [`ProbeDriver`]. The interaction
//! primitives own the waiting and validation policy; a driver only answers
//! single round-trip questions and performs single actions against the first
//! element matching a selector.
//!
//! # Implementations
//!
//! - `ChromiumDriver` - CDP via chromiumoxide (feature `browser`)
//! - [`MockDriver`](crate::MockDriver) - in-memory DOM for unit testing

use crate::locator::Selector;
use crate::result::ProbeResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Snapshot of one element's actionable state, read in a single round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementState {
    /// Lower-case tag name
    pub tag_name: String,
    /// Rendered and not hidden by style or zero size
    pub visible: bool,
    /// Not disabled
    pub enabled: bool,
    /// Accepts typed input (form control or content-editable, not read-only)
    pub editable: bool,
    /// Checked state for radios and checkboxes
    pub checked: bool,
    /// Rendered inner text
    pub text: String,
    /// Current `value` for form controls
    pub value: Option<String>,
}

impl ElementState {
    /// Why a click would be rejected, if it would be
    #[must_use]
    pub fn click_blocker(&self) -> Option<&'static str> {
        if !self.visible {
            Some("element is not visible")
        } else if !self.enabled {
            Some("element is disabled")
        } else {
            None
        }
    }

    /// Why a fill would be rejected, if it would be
    #[must_use]
    pub fn fill_blocker(&self) -> Option<&'static str> {
        if !self.enabled {
            Some("element is disabled")
        } else if !self.editable {
            Some("element does not accept text input")
        } else {
            None
        }
    }
}

/// Abstract driver trait for browser automation.
///
/// A driver value is the session handle: one page or tab, owned by whoever
/// opened it. Reads take `&self`; anything that mutates the page takes
/// `&mut self`.
#[async_trait]
pub trait ProbeDriver: Send + Sync {
    /// Navigate to URL and wait for the load lifecycle
    async fn navigate(&mut self, url: &str) -> ProbeResult<()>;

    /// Current document URL
    async fn current_url(&self) -> ProbeResult<String>;

    /// State of the first element matching `selector`, `None` when absent
    async fn element_state(&self, selector: &Selector) -> ProbeResult<Option<ElementState>>;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &Selector) -> ProbeResult<usize>;

    /// Attribute of the first match; `ElementNotFound` when nothing matches
    async fn attribute(&self, selector: &Selector, name: &str) -> ProbeResult<Option<String>>;

    /// Clear and set the value of the first match, then dispatch `input` and
    /// `change` so reactive validation observes it
    async fn set_value(&mut self, selector: &Selector, value: &str) -> ProbeResult<()>;

    /// Dispatch a user-equivalent click on the first match
    async fn click(&mut self, selector: &Selector) -> ProbeResult<()>;

    /// Serialized HTML of the current document
    async fn content(&self) -> ProbeResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ElementState {
        ElementState {
            tag_name: "input".to_string(),
            visible: true,
            enabled: true,
            editable: true,
            ..ElementState::default()
        }
    }

    #[test]
    fn test_clickable_state() {
        assert!(state().click_blocker().is_none());
        assert!(state().fill_blocker().is_none());
    }

    #[test]
    fn test_hidden_blocks_click_not_fill() {
        let hidden = ElementState {
            visible: false,
            ..state()
        };
        assert_eq!(hidden.click_blocker(), Some("element is not visible"));
        assert!(hidden.fill_blocker().is_none());
    }

    #[test]
    fn test_disabled_blocks_both() {
        let disabled = ElementState {
            enabled: false,
            ..state()
        };
        assert_eq!(disabled.click_blocker(), Some("element is disabled"));
        assert_eq!(disabled.fill_blocker(), Some("element is disabled"));
    }

    #[test]
    fn test_read_only_blocks_fill() {
        let label = ElementState {
            tag_name: "label".to_string(),
            editable: false,
            ..state()
        };
        assert_eq!(
            label.fill_blocker(),
            Some("element does not accept text input")
        );
    }

    #[test]
    fn test_state_deserializes_from_camel_case() {
        let json = r#"{"tagName":"input","visible":true,"enabled":true,"editable":true,"checked":false,"text":"","value":"John"}"#;
        let parsed: ElementState = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.value.as_deref(), Some("John"));
        assert_eq!(parsed.tag_name, "input");
    }
}
