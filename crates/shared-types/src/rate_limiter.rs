//! # Rate Limiter
//!
//! Minimum-interval rate limiter for outbound calls to external sources.
//!
//! Each service owns one limiter. Before any outbound query the service
//! awaits [`RateLimiter::check_rate_limit`], which returns once at least the
//! configured interval has elapsed since the previous permitted call and
//! records the new call time. Limits are per service, never global.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Clock abstraction so tests can drive the limiter deterministically.
#[async_trait]
pub trait TimeSource: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;

    /// Suspend the caller until `deadline`.
    async fn sleep_until(&self, deadline: Instant);
}

/// Default time source backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

#[async_trait]
impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, deadline: Instant) {
        tokio::time::sleep_until(deadline).await;
    }
}

/// Minimum-interval rate limiter.
///
/// # Algorithm
///
/// - The first call is permitted immediately
/// - Every later call waits until `last + min_interval`
/// - Waiters are served one at a time, so concurrent callers are spaced too
pub struct RateLimiter {
    /// Minimum time between two permitted calls.
    min_interval: RwLock<Duration>,
    /// When the last call was permitted. Held across the wait.
    last_call: Mutex<Option<Instant>>,
    /// Clock used for both reading and sleeping.
    clock: Arc<dyn TimeSource>,
}

impl RateLimiter {
    /// Create a limiter on the system clock.
    pub fn new(min_interval: Duration) -> Self {
        Self::with_time_source(min_interval, Arc::new(SystemTimeSource))
    }

    /// Create a limiter on an injected clock.
    pub fn with_time_source(min_interval: Duration, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            min_interval: RwLock::new(min_interval),
            last_call: Mutex::new(None),
            clock,
        }
    }

    /// Get the configured interval.
    pub fn min_interval(&self) -> Duration {
        *self.min_interval.read()
    }

    /// Replace the configured interval. Applies to the next wait.
    pub fn set_min_interval(&self, min_interval: Duration) {
        *self.min_interval.write() = min_interval;
    }

    /// Wait until a call is permitted, then record it.
    ///
    /// Returns the instant at which the call was permitted.
    pub async fn check_rate_limit(&self) -> Instant {
        let mut last = self.last_call.lock().await;

        if let Some(prev) = *last {
            let ready = prev + self.min_interval();
            if self.clock.now() < ready {
                trace!(wait = ?(ready - self.clock.now()), "Rate limited");
                self.clock.sleep_until(ready).await;
            }
        }

        let now = self.clock.now();
        *last = Some(now);
        now
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("min_interval", &self.min_interval())
            .finish_non_exhaustive()
    }
}

/// Mock time source for testing.
///
/// `sleep_until` jumps the clock forward instead of waiting.
#[cfg(test)]
pub struct MockTimeSource {
    origin: Instant,
    offset: parking_lot::Mutex<Duration>,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: parking_lot::Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }

    pub fn elapsed(&self) -> Duration {
        *self.offset.lock()
    }
}

#[cfg(test)]
#[async_trait]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }

    async fn sleep_until(&self, deadline: Instant) {
        let mut offset = self.offset.lock();
        let target = deadline.saturating_duration_since(self.origin);
        if target > *offset {
            *offset = target;
        }
    }
}
