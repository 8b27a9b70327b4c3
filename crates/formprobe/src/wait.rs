//! Wait mechanisms for synchronization.
//!
//! Every suspending primitive carries a timeout. Waiting is done by polling a
//! condition on the tokio clock, so paused-time tests run instantly.

use crate::locator::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::result::{ProbeError, ProbeResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Default timeout for element waits (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = DEFAULT_TIMEOUT_MS;

/// Default timeout for navigation (30 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Page load states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// Wait for the `load` event to fire
    #[default]
    Load,
    /// Wait for `DOMContentLoaded` event
    DomContentLoaded,
}

impl LoadState {
    /// Get the JavaScript event name for this load state
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
        }
    }

    /// `document.readyState` values that satisfy this load state
    #[must_use]
    pub const fn ready_states(&self) -> &'static [&'static str] {
        match self {
            Self::Load => &["complete"],
            Self::DomContentLoaded => &["interactive", "complete"],
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

/// Options for element wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Options for navigation waits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Load state to wait for
    pub wait_until: LoadState,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            wait_until: LoadState::Load,
        }
    }
}

impl NavigationOptions {
    /// Create new navigation options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set load state
    #[must_use]
    pub const fn with_wait_until(mut self, state: LoadState) -> Self {
        self.wait_until = state;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Result of a successful wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of times the condition was evaluated
    pub attempts: u32,
    /// Description of what was waited for
    pub waited_for: String,
}

/// Poll `check` until it yields `true` or the timeout expires.
///
/// Errors from `check` propagate immediately. On expiry the error is
/// [`ProbeError::Timeout`] naming `waited_for`.
pub async fn poll_until<F, Fut>(
    waited_for: &str,
    options: &WaitOptions,
    mut check: F,
) -> ProbeResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<bool>>,
{
    let start = Instant::now();
    let deadline = start + options.timeout();
    let mut attempts = 0_u32;

    loop {
        attempts += 1;
        if check().await? {
            return Ok(WaitResult {
                elapsed: start.elapsed(),
                attempts,
                waited_for: waited_for.to_string(),
            });
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(ProbeError::Timeout {
                selector: waited_for.to_string(),
                ms: options.timeout_ms,
            });
        }
        tokio::time::sleep(options.poll_interval().min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    mod load_state_tests {
        use super::*;

        #[test]
        fn test_event_names() {
            assert_eq!(LoadState::Load.event_name(), "load");
            assert_eq!(LoadState::DomContentLoaded.to_string(), "DOMContentLoaded");
        }

        #[test]
        fn test_ready_states() {
            assert_eq!(LoadState::Load.ready_states(), &["complete"]);
            assert!(LoadState::DomContentLoaded
                .ready_states()
                .contains(&"interactive"));
        }
    }

    mod options_tests {
        use super::*;

        #[test]
        fn test_wait_options_default() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, 5000);
            assert_eq!(opts.poll_interval_ms, 50);
        }

        #[test]
        fn test_wait_options_chained() {
            let opts = WaitOptions::new().with_timeout(250).with_poll_interval(5);
            assert_eq!(opts.timeout(), Duration::from_millis(250));
            assert_eq!(opts.poll_interval(), Duration::from_millis(5));
        }

        #[test]
        fn test_navigation_options() {
            let opts = NavigationOptions::new()
                .with_timeout(1000)
                .with_wait_until(LoadState::DomContentLoaded);
            assert_eq!(opts.timeout(), Duration::from_secs(1));
            assert_eq!(opts.wait_until, LoadState::DomContentLoaded);
            assert_eq!(
                NavigationOptions::default().timeout_ms,
                DEFAULT_NAVIGATION_TIMEOUT_MS
            );
        }
    }

    mod poll_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_immediate_success() {
            let result = poll_until("ready", &WaitOptions::default(), || async { Ok(true) })
                .await
                .unwrap();
            assert_eq!(result.attempts, 1);
            assert_eq!(result.waited_for, "ready");
        }

        #[tokio::test(start_paused = true)]
        async fn test_eventual_success() {
            let calls = AtomicU32::new(0);
            let result = poll_until("third time", &WaitOptions::default(), || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n >= 2) }
            })
            .await
            .unwrap();
            assert_eq!(result.attempts, 3);
            assert_eq!(result.elapsed, Duration::from_millis(100));
        }

        #[tokio::test(start_paused = true)]
        async fn test_timeout() {
            let opts = WaitOptions::new().with_timeout(120).with_poll_interval(50);
            let err = poll_until(".never", &opts, || async { Ok(false) })
                .await
                .unwrap_err();
            match err {
                ProbeError::Timeout { selector, ms } => {
                    assert_eq!(selector, ".never");
                    assert_eq!(ms, 120);
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_check_error_propagates() {
            let err = poll_until("x", &WaitOptions::default(), || async {
                Err::<bool, _>(ProbeError::session("page closed"))
            })
            .await
            .unwrap_err();
            assert!(matches!(err, ProbeError::Session { .. }));
        }
    }
}
