//! Sliding-window request limiter keyed by an arbitrary identifier.
//!
//! Each identifier keeps the instants of its accepted requests inside the
//! trailing window. Old instants are pruned on every check; nothing runs in
//! the background.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Default trailing window: 60 seconds.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(60_000);

/// Default number of requests allowed per window.
pub const DEFAULT_MAX_REQUESTS: usize = 10;

pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    requests: RwLock<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: RwLock::new(HashMap::new()),
        }
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a request for `identifier` if it is under the limit.
    ///
    /// Returns `false` without recording when the window is already full.
    pub async fn is_allowed(&self, identifier: &str) -> bool {
        self.is_allowed_at(identifier, Instant::now()).await
    }

    pub async fn is_allowed_at(&self, identifier: &str, now: Instant) -> bool {
        let mut requests = self.requests.write().await;
        let series = requests.entry(identifier.to_string()).or_default();
        prune(series, now, self.window);

        if series.len() >= self.max_requests {
            tracing::debug!(identifier, limit = self.max_requests, "Rate limit reached");
            return false;
        }
        series.push_back(now);
        true
    }

    /// Requests still available to `identifier` in the current window.
    pub async fn remaining_requests(&self, identifier: &str) -> usize {
        self.remaining_requests_at(identifier, Instant::now()).await
    }

    pub async fn remaining_requests_at(&self, identifier: &str, now: Instant) -> usize {
        let used = self.active_count(identifier, now).await;
        self.max_requests.saturating_sub(used)
    }

    /// Time until the oldest in-window request expires and frees a slot.
    ///
    /// Zero when the identifier has no requests in the window.
    pub async fn reset_time(&self, identifier: &str) -> Duration {
        self.reset_time_at(identifier, Instant::now()).await
    }

    pub async fn reset_time_at(&self, identifier: &str, now: Instant) -> Duration {
        let requests = self.requests.read().await;
        requests
            .get(identifier)
            .and_then(|series| series.iter().find(|t| in_window(**t, now, self.window)))
            .map(|oldest| (*oldest + self.window).saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    /// Drop identifiers whose requests have all left the window.
    pub async fn purge_idle(&self) -> usize {
        let now = Instant::now();
        let mut requests = self.requests.write().await;
        let before = requests.len();
        requests.retain(|_, series| {
            prune(series, now, self.window);
            !series.is_empty()
        });
        before - requests.len()
    }

    async fn active_count(&self, identifier: &str, now: Instant) -> usize {
        let requests = self.requests.read().await;
        requests.get(identifier).map_or(0, |series| {
            series.iter().filter(|t| in_window(**t, now, self.window)).count()
        })
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

fn in_window(t: Instant, now: Instant, window: Duration) -> bool {
    now.saturating_duration_since(t) < window
}

fn prune(series: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while series.front().is_some_and(|t| !in_window(*t, now, window)) {
        series.pop_front();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
