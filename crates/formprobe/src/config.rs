//! Harness configuration.
//!
//! Layering, lowest to highest precedence: built-in defaults, a YAML file,
//! environment variables, then whatever the caller (the CLI) sets last.

use crate::locator::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::page_object::join_url;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{WaitOptions, DEFAULT_NAVIGATION_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding [`HarnessConfig::base_url`]
pub const ENV_BASE_URL: &str = "FORMPROBE_BASE_URL";
/// Environment variable overriding [`BrowserSettings::headless`]
pub const ENV_HEADLESS: &str = "FORMPROBE_HEADLESS";
/// Environment variable overriding [`BrowserSettings::chromium_path`]
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";

/// Default application under test
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run without a visible window
    pub headless: bool,
    /// Chromium executable; auto-detected when `None`
    pub chromium_path: Option<PathBuf>,
    /// Keep the Chromium sandbox enabled
    pub sandbox: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Upper bound for one navigation
    pub navigation_timeout_ms: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            chromium_path: None,
            sandbox: true,
            viewport_width: 1280,
            viewport_height: 800,
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
        }
    }
}

impl BrowserSettings {
    /// Navigation timeout as Duration
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Root URL of the application under test
    pub base_url: String,
    /// Browser settings
    pub browser: BrowserSettings,
    /// Default element wait
    pub element_timeout_ms: u64,
    /// Poll interval while waiting
    pub poll_interval_ms: u64,
    /// Fixture file replacing the built-in fixtures
    pub fixtures_path: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: BrowserSettings::default(),
            element_timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            fixtures_path: None,
        }
    }
}

impl HarnessConfig {
    /// Parse from YAML
    pub fn from_yaml_str(yaml: &str) -> ProbeResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProbeError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(flag) = lookup(ENV_HEADLESS) {
            match flag.trim().to_ascii_lowercase().as_str() {
                "0" | "false" | "no" | "off" => self.browser.headless = false,
                "1" | "true" | "yes" | "on" => self.browser.headless = true,
                _ => {}
            }
        }
        if let Some(path) = lookup(ENV_CHROMIUM_PATH).filter(|v| !v.is_empty()) {
            self.browser.chromium_path = Some(PathBuf::from(path));
        }
        self
    }

    /// Reject values no run could succeed with
    pub fn validate(&self) -> ProbeResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProbeError::config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.element_timeout_ms == 0 {
            return Err(ProbeError::config("element_timeout_ms must be positive"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ProbeError::config("poll_interval_ms must be positive"));
        }
        Ok(())
    }

    /// URL of the profile form
    #[must_use]
    pub fn form_url(&self) -> String {
        join_url(&self.base_url, "/")
    }

    /// Wait options for the interaction primitives
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.element_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }
}
