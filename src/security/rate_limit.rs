//! Per-client submission rate limiting.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

/// Time source for the limiter. Swapped for a manual clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// System clock backed by `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Limited {
        /// Time until the oldest recorded attempt leaves the window.
        retry_after: Duration,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Sliding-window submission counter keyed by client address.
///
/// Entries older than the window are pruned lazily on each check, so a
/// key never holds more than `max_per_window` fresh timestamps once a
/// check has run. Idle keys are never evicted; see DESIGN.md.
pub struct RateLimiter {
    window: Duration,
    limit: usize,
    history: Mutex<HashMap<String, Vec<Instant>>>,
    clock: Box<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock(config: &RateLimitConfig, clock: impl Clock + 'static) -> Self {
        Self {
            window: Duration::from_secs(config.window_secs),
            limit: config.max_per_window as usize,
            history: Mutex::new(HashMap::new()),
            clock: Box::new(clock),
        }
    }

    /// Check whether `client` may submit now, recording the attempt if so.
    ///
    /// Prune-then-count-then-record: a rejecting check leaves the window
    /// untouched, so hammering a limited client does not extend the wait.
    pub fn check(&self, client: &str) -> Decision {
        let now = self.clock.now();
        let mut history = self.history.lock().expect("rate limiter mutex poisoned");
        let timestamps = history.entry(client.to_string()).or_default();

        timestamps.retain(|&t| now.duration_since(t) < self.window);

        if timestamps.len() >= self.limit {
            // retain keeps insertion order, so the first entry is oldest
            let oldest = timestamps[0];
            let retry_after = self.window.saturating_sub(now.duration_since(oldest));
            return Decision::Limited { retry_after };
        }

        timestamps.push(now);
        Decision::Allowed
    }

    /// Number of fresh attempts currently recorded for `client`.
    pub fn recorded(&self, client: &str) -> usize {
        let now = self.clock.now();
        let history = self.history.lock().expect("rate limiter mutex poisoned");
        history
            .get(client)
            .map(|timestamps| {
                timestamps
                    .iter()
                    .filter(|&&t| now.duration_since(t) < self.window)
                    .count()
            })
            .unwrap_or(0)
    }
}
