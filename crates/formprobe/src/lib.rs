//! Formprobe: Page Object Model harness for a user profile creation form
//!
//! Formprobe drives a real browser (Chromium over CDP) through a layered
//! Page Object Model and checks the form's validation and UX behavior,
//! including its documented defects.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │   ┌────────────┐   ┌────────────┐   ┌──────────────┐         │
//! │   │ Scenario   │──►│ Profile    │──►│ Interactions │──┐      │
//! │   │ catalog    │   │ FormPage   │   │ (waits)      │  │      │
//! │   └────────────┘   └────────────┘   └──────────────┘  ▼      │
//! │         ▲                               ┌────────────────┐   │
//! │   ┌────────────┐                        │ ProbeDriver    │   │
//! │   │ SuiteRunner│── SessionFactory ─────►│ Chromium│Mock  │   │
//! │   └────────────┘                        └────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use formprobe::{simulated_profile_app, ProbeResult, ProfileFormPage};
//!
//! # async fn demo() -> ProbeResult<()> {
//! let mut session = simulated_profile_app("http://localhost:3000");
//! let mut page = ProfileFormPage::new(&mut session);
//! page.navigate_to_form("http://localhost:3000").await?;
//! page.fill_mandatory_fields("John", "Smith", "john.smith@example.com", "P@ssw0rd123")
//!     .await?;
//! page.submit_form().await?;
//! assert!(page.is_error_message_displayed().await?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

#[cfg(feature = "browser")]
mod browser;
mod config;
mod driver;
mod fixtures;
mod harness;
mod interaction;
mod locator;
mod mock;
mod page_object;
mod profile_form;
mod result;
mod scenario;
mod simulated;
mod wait;

#[cfg(feature = "browser")]
pub use browser::{ChromiumBrowser, ChromiumDriver, ChromiumSessions};
pub use config::{
    BrowserSettings, HarnessConfig, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_CHROMIUM_PATH,
    ENV_HEADLESS,
};
pub use driver::{ElementState, ProbeDriver};
pub use fixtures::{reference_profile, ErrorMessages, FormFixtures, InvalidValues, UiExpectations};
pub use harness::{
    MockSessions, Outcome, RunReport, ScenarioFilter, ScenarioResult, SessionFactory, SuiteRunner,
};
pub use interaction::Interactions;
pub use locator::{
    js_string, Locator, LocatorOptions, Selector, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};
pub use mock::{DomHook, MockDom, MockDriver, MockElement, MockPage};
pub use page_object::{join_url, PageObject, SelectorMap, SelectorMapBuilder};
pub use profile_form::{
    FormElement, Gender, ProfileData, ProfileField, ProfileFormPage, ProfileSelectors,
};
pub use result::{ProbeError, ProbeResult};
pub use scenario::{catalog, expect_eq, expect_that, find, run_scenario, Scenario, ScenarioId, Suite};
pub use simulated::{simulated_profile_app, simulated_profile_page, LEAKED_SECRET};
pub use wait::{
    poll_until, LoadState, NavigationOptions, WaitOptions, WaitResult,
    DEFAULT_NAVIGATION_TIMEOUT_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
