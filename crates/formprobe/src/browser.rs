//! Chromium backend over the Chrome DevTools Protocol.
//!
//! One [`ChromiumBrowser`] process serves many sessions; each
//! [`ChromiumDriver`] is a single page (tab). Element reads are done with one
//! `Runtime.evaluate` round trip that returns JSON, so a missing element is a
//! plain `null` rather than a protocol error.

use crate::config::BrowserSettings;
use crate::driver::{ElementState, ProbeDriver};
use crate::harness::SessionFactory;
use crate::locator::{js_string, Selector};
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{poll_until, LoadState, NavigationOptions, WaitOptions};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// A running Chromium process
#[derive(Debug)]
pub struct ChromiumBrowser {
    settings: BrowserSettings,
    inner: Arc<Mutex<CdpBrowser>>,
    handle: tokio::task::JoinHandle<()>,
}

impl ChromiumBrowser {
    /// Launch Chromium with `settings`
    pub async fn launch(settings: &BrowserSettings) -> ProbeResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(settings.viewport_width, settings.viewport_height);

        if !settings.headless {
            builder = builder.with_head();
        }

        if !settings.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = settings.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|message| ProbeError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!(headless = settings.headless, "chromium launched");
        Ok(Self {
            settings: settings.clone(),
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }

    /// Open a fresh page
    pub async fn new_session(&self) -> ProbeResult<ChromiumDriver> {
        let browser = self.inner.lock().await;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(ProbeError::session)?;
        Ok(ChromiumDriver {
            page,
            navigation: NavigationOptions::new()
                .with_timeout(self.settings.navigation_timeout_ms)
                .with_wait_until(LoadState::Load),
        })
    }

    /// Launch settings
    #[must_use]
    pub const fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    /// Shut the browser down
    pub async fn close(self) -> ProbeResult<()> {
        {
            let mut browser = self.inner.lock().await;
            let _ = browser.close().await.map_err(ProbeError::session)?;
            match exit_problem(&browser.wait().await) {
                Some(problem) => warn!(%problem, "chromium did not shut down cleanly"),
                None => debug!("chromium exited"),
            }
        }
        self.handle.abort();
        Ok(())
    }
}

/// What went wrong reaping the browser process, if anything
fn exit_problem(waited: &std::io::Result<Option<ExitStatus>>) -> Option<String> {
    match waited {
        Ok(Some(status)) if !status.success() => Some(format!("exited with {status}")),
        Ok(_) => None,
        Err(e) => Some(format!("could not reap process: {e}")),
    }
}

/// One Chromium page driven over CDP
#[derive(Debug)]
pub struct ChromiumDriver {
    page: CdpPage,
    navigation: NavigationOptions,
}

#[derive(Debug, Deserialize)]
struct AttributeRead {
    value: Option<String>,
}

const STATE_SCRIPT: &str = r"
    if (!el) return null;
    const style = window.getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    const visible = style.visibility !== 'hidden' && style.display !== 'none'
        && rect.width > 0 && rect.height > 0;
    const tag = el.tagName.toLowerCase();
    const textual = !['radio', 'checkbox', 'submit', 'button', 'reset', 'file', 'image', 'hidden']
        .includes((el.type || '').toLowerCase());
    const control = tag === 'textarea' || tag === 'select' || (tag === 'input' && textual);
    const enabled = !el.disabled;
    const editable = enabled && !el.readOnly && (control || el.isContentEditable);
    return {
        tagName: tag,
        visible,
        enabled,
        editable,
        checked: !!el.checked,
        text: visible ? el.innerText || '' : '',
        value: 'value' in el && typeof el.value === 'string' ? el.value : null,
    };
";

const SET_VALUE_SCRIPT: &str = r"
    if (!el) return false;
    el.focus();
    if ('value' in el) {
        const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype
            : el instanceof HTMLSelectElement ? HTMLSelectElement.prototype
            : HTMLInputElement.prototype;
        Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, value);
    } else {
        el.textContent = value;
    }
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
";

/// Protocol errors meaning the page's document went away mid-call (a submit
/// or reload replaced it)
const CONTEXT_LOST: [&str; 3] = [
    "Execution context was destroyed",
    "Cannot find context with specified id",
    "Cannot find default execution context",
];

fn is_context_lost(err: &ProbeError) -> bool {
    matches!(err, ProbeError::Session { message }
        if CONTEXT_LOST.iter().any(|lost| message.contains(lost)))
}

/// Wait options for the load phase of a navigation that started at
/// `started` with an overall `budget`
fn load_wait_options(budget: Duration, started: Instant) -> WaitOptions {
    let left = budget.saturating_sub(started.elapsed());
    WaitOptions::new().with_timeout(u64::try_from(left.as_millis()).unwrap_or(u64::MAX))
}

/// Wrap a function body so it runs against the first match and yields JSON
fn element_script(selector: &Selector, prelude: &str, body: &str) -> String {
    format!(
        "JSON.stringify((() => {{ {prelude} const el = {query}; {body} }})())",
        query = selector.to_query()
    )
}

impl ChromiumDriver {
    async fn evaluate_text(&self, script: &str) -> ProbeResult<String> {
        self.page
            .evaluate(script)
            .await
            .map_err(ProbeError::session)?
            .into_value()
            .map_err(ProbeError::session)
    }

    /// Evaluate `script`; if a navigation destroyed the document meanwhile,
    /// wait for the next one to load and evaluate once more
    async fn eval_json<T: DeserializeOwned>(&self, script: String) -> ProbeResult<T> {
        let json = match self.evaluate_text(&script).await {
            Err(e) if is_context_lost(&e) => {
                debug!(error = %e, "document replaced, waiting for the next load");
                let options = load_wait_options(self.navigation.timeout(), Instant::now());
                self.wait_for_load("current document", &options).await?;
                self.evaluate_text(&script).await?
            }
            other => other?,
        };
        Ok(serde_json::from_str(&json)?)
    }

    async fn wait_for_load(&self, url: &str, options: &WaitOptions) -> ProbeResult<()> {
        let states = self.navigation.wait_until.ready_states();
        let waited_for = format!("{} of {url}", self.navigation.wait_until);
        poll_until(&waited_for, options, || async {
            match self
                .evaluate_text("JSON.stringify(document.readyState)")
                .await
            {
                Ok(json) => {
                    let state: String = serde_json::from_str(&json)?;
                    Ok(states.contains(&state.as_str()))
                }
                Err(e) if is_context_lost(&e) => Ok(false),
                Err(e) => Err(e),
            }
        })
        .await
        .map(|_| ())
        .map_err(|e| ProbeError::Navigation {
            url: url.to_string(),
            message: if e.is_timeout() {
                format!("load not finished within {}ms", self.navigation.timeout_ms)
            } else {
                e.to_string()
            },
        })
    }

    /// Close the page
    pub async fn close(self) -> ProbeResult<()> {
        self.page.close().await.map_err(ProbeError::session)
    }
}

#[async_trait]
impl ProbeDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        let budget = self.navigation.timeout();
        let started = Instant::now();
        match tokio::time::timeout(budget, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(ProbeError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(ProbeError::Navigation {
                    url: url.to_string(),
                    message: format!("timed out after {}ms", self.navigation.timeout_ms),
                })
            }
        }
        // goto and the load wait share one budget
        self.wait_for_load(url, &load_wait_options(budget, started))
            .await
    }

    async fn current_url(&self) -> ProbeResult<String> {
        Ok(self
            .page
            .url()
            .await
            .map_err(ProbeError::session)?
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn element_state(&self, selector: &Selector) -> ProbeResult<Option<ElementState>> {
        self.eval_json(element_script(selector, "", STATE_SCRIPT))
            .await
    }

    async fn count(&self, selector: &Selector) -> ProbeResult<usize> {
        self.eval_json(format!("JSON.stringify({})", selector.to_count_query()))
            .await
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> ProbeResult<Option<String>> {
        let body = format!(
            "if (!el) return null; return {{ value: el.getAttribute({}) }};",
            js_string(name)
        );
        let read: Option<AttributeRead> =
            self.eval_json(element_script(selector, "", &body)).await?;
        read.map(|r| r.value)
            .ok_or_else(|| ProbeError::not_found(selector.to_string()))
    }

    async fn set_value(&mut self, selector: &Selector, value: &str) -> ProbeResult<()> {
        let prelude = format!("const value = {};", js_string(value));
        let found: bool = self
            .eval_json(element_script(selector, &prelude, SET_VALUE_SCRIPT))
            .await?;
        if found {
            Ok(())
        } else {
            Err(ProbeError::not_found(selector.to_string()))
        }
    }

    async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
        let element = match selector {
            Selector::Css(css) => self.page.find_element(css.as_str()).await,
            Selector::XPath(xpath) => self.page.find_xpath(xpath.as_str()).await,
        }
        .map_err(|_| ProbeError::not_found(selector.to_string()))?;
        let _ = element
            .click()
            .await
            .map_err(|e| ProbeError::NotInteractable {
                selector: selector.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn content(&self) -> ProbeResult<String> {
        self.page.content().await.map_err(ProbeError::session)
    }
}

/// One shared browser, one page per session
#[derive(Debug)]
pub struct ChromiumSessions {
    browser: ChromiumBrowser,
}

impl ChromiumSessions {
    /// Launch the browser all sessions will share
    pub async fn launch(settings: &BrowserSettings) -> ProbeResult<Self> {
        Ok(Self {
            browser: ChromiumBrowser::launch(settings).await?,
        })
    }

    /// Shut the shared browser down
    pub async fn shutdown(self) -> ProbeResult<()> {
        self.browser.close().await
    }
}

#[async_trait]
impl SessionFactory for ChromiumSessions {
    type Driver = ChromiumDriver;

    async fn open(&self) -> ProbeResult<ChromiumDriver> {
        self.browser.new_session().await
    }

    async fn close(&self, driver: ChromiumDriver) -> ProbeResult<()> {
        driver.close().await.inspect_err(|e| {
            warn!(error = %e, "page did not close cleanly");
        })
    }
}
