//! Browser interaction primitives.
//!
//! [`Interactions`] is the uniform API every page object delegates to. It
//! knows nothing about any particular form. It borrows one session
//! exclusively, so operations run in the order they are issued, and it owns
//! the synchronization policy:
//!
//! | operation | waits | missing element |
//! |---|---|---|
//! | `navigate` | load lifecycle, navigation timeout | n/a |
//! | `wait_for_visible` | polls until visible or timeout | keeps polling |
//! | `is_visible` | no | `false` |
//! | `get_text` | no | `ElementNotFound` |
//! | `fill` | no | `ElementNotFound` |
//! | `click` / `check` | no | `ElementNotFound` |
//!
//! Failures propagate unchanged; nothing is retried beyond the stated wait.

use crate::driver::{ElementState, ProbeDriver};
use crate::locator::{Locator, Selector};
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{poll_until, WaitOptions, WaitResult};
use std::time::Duration;
use tracing::debug;

/// Synchronization-safe primitives over one borrowed session.
#[derive(Debug)]
pub struct Interactions<'s, D: ProbeDriver> {
    driver: &'s mut D,
    options: WaitOptions,
}

impl<'s, D: ProbeDriver> Interactions<'s, D> {
    /// Bind to a live session with default wait options
    pub fn new(driver: &'s mut D) -> Self {
        Self::with_options(driver, WaitOptions::default())
    }

    /// Bind to a live session with custom wait options
    pub fn with_options(driver: &'s mut D, options: WaitOptions) -> Self {
        Self { driver, options }
    }

    /// Wait options used by [`wait_for_visible_default`](Self::wait_for_visible_default)
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// The underlying session
    #[must_use]
    pub fn driver(&self) -> &D {
        self.driver
    }

    /// Load `url` in the session
    pub async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        debug!(url, "navigate");
        self.driver.navigate(url).await
    }

    /// Current document URL
    pub async fn current_url(&self) -> ProbeResult<String> {
        self.driver.current_url().await
    }

    /// Lazy handle for `selector`; nothing is resolved until it is used
    #[must_use]
    pub fn resolve_locator(&self, selector: &Selector) -> Locator {
        Locator::from_selector(selector.clone())
            .with_timeout(self.options.timeout())
            .with_poll_interval(self.options.poll_interval())
    }

    /// Suspend until an element matching `selector` is visible
    pub async fn wait_for_visible(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> ProbeResult<WaitResult> {
        let options = WaitOptions {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ..self.options
        };
        debug!(%selector, timeout_ms = options.timeout_ms, "wait_for_visible");
        let driver: &D = self.driver;
        let waited_for = selector.to_string();
        poll_until(&waited_for, &options, move || async move {
            Ok(driver
                .element_state(selector)
                .await?
                .is_some_and(|s| s.visible))
        })
        .await
    }

    /// [`wait_for_visible`](Self::wait_for_visible) with the configured timeout
    pub async fn wait_for_visible_default(&self, selector: &Selector) -> ProbeResult<WaitResult> {
        self.wait_for_visible(selector, self.options.timeout()).await
    }

    /// Single visibility check; `false` when nothing matches
    pub async fn is_visible(&self, selector: &Selector) -> ProbeResult<bool> {
        let visible = self
            .driver
            .element_state(selector)
            .await?
            .is_some_and(|s| s.visible);
        debug!(%selector, visible, "is_visible");
        Ok(visible)
    }

    /// Rendered inner text of the first match
    pub async fn get_text(&self, selector: &Selector) -> ProbeResult<String> {
        debug!(%selector, "get_text");
        Ok(self.require(selector).await?.text)
    }

    /// Current `value` of the first match (`""` for elements without one)
    pub async fn input_value(&self, selector: &Selector) -> ProbeResult<String> {
        debug!(%selector, "input_value");
        Ok(self.require(selector).await?.value.unwrap_or_default())
    }

    /// Attribute of the first match, `None` when the attribute is absent
    pub async fn attribute(&self, selector: &Selector, name: &str) -> ProbeResult<Option<String>> {
        debug!(%selector, name, "attribute");
        self.driver.attribute(selector, name).await
    }

    /// Number of matching elements
    pub async fn count(&self, selector: &Selector) -> ProbeResult<usize> {
        let count = self.driver.count(selector).await?;
        debug!(%selector, count, "count");
        Ok(count)
    }

    /// Serialized HTML of the current document
    pub async fn content(&self) -> ProbeResult<String> {
        self.driver.content().await
    }

    /// Clear the first match and set its value to `value`
    pub async fn fill(&mut self, selector: &Selector, value: &str) -> ProbeResult<()> {
        debug!(%selector, len = value.len(), "fill");
        let state = self.require(selector).await?;
        if let Some(reason) = state.fill_blocker() {
            return Err(ProbeError::NotEditable {
                selector: selector.to_string(),
                reason: reason.to_string(),
            });
        }
        self.driver.set_value(selector, value).await
    }

    /// User-equivalent click on the first match
    pub async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
        debug!(%selector, "click");
        let state = self.require(selector).await?;
        if let Some(reason) = state.click_blocker() {
            return Err(ProbeError::NotInteractable {
                selector: selector.to_string(),
                reason: reason.to_string(),
            });
        }
        self.driver.click(selector).await
    }

    /// Click a radio or checkbox and confirm it reports checked
    pub async fn check(&mut self, selector: &Selector) -> ProbeResult<()> {
        if self.require(selector).await?.checked {
            return Ok(());
        }
        self.click(selector).await?;
        if self.require(selector).await?.checked {
            Ok(())
        } else {
            Err(ProbeError::NotInteractable {
                selector: selector.to_string(),
                reason: "element did not become checked".to_string(),
            })
        }
    }

    async fn require(&self, selector: &Selector) -> ProbeResult<ElementState> {
        self.driver
            .element_state(selector)
            .await?
            .ok_or_else(|| ProbeError::not_found(selector.to_string()))
    }
}
