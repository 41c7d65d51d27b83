//! Outbound rate limiting
//!
//! A [`RateLimiter`] enforces a minimum spacing between successive outbound
//! calls. One instance may be shared (behind an `Arc`) by several providers;
//! admissions are then spaced across all of them. The first acquire on a
//! fresh limiter is admitted immediately.

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::Quota;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Default spacing between calls to a search provider
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(10);

/// Admission control for outbound calls
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until the next call slot is available
    async fn acquire(&self);

    /// Minimum spacing this limiter enforces
    fn min_interval(&self) -> Duration;
}

/// Minimum-interval limiter backed by a `governor` quota of one cell per period
pub struct IntervalLimiter {
    inner: governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    interval: Duration,
}

impl IntervalLimiter {
    /// Create a limiter admitting one call per `interval`.
    ///
    /// Returns `None` for a zero interval; use [`Unlimited`] instead.
    pub fn new(interval: Duration) -> Option<Self> {
        let quota = Quota::with_period(interval)?;
        Some(Self {
            inner: governor::RateLimiter::direct(quota),
            interval,
        })
    }
}

#[async_trait]
impl RateLimiter for IntervalLimiter {
    async fn acquire(&self) {
        trace!(interval_ms = self.interval.as_millis() as u64, "ratelimit.wait");
        self.inner.until_ready().await;
    }

    fn min_interval(&self) -> Duration {
        self.interval
    }
}

/// Limiter that admits every call immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn acquire(&self) {}

    fn min_interval(&self) -> Duration {
        Duration::ZERO
    }
}

/// Build the appropriate limiter for a minimum interval
pub fn limiter_for(interval: Duration) -> Arc<dyn RateLimiter> {
    match IntervalLimiter::new(interval) {
        Some(limiter) => Arc::new(limiter),
        None => Arc::new(Unlimited),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_zero_interval_is_unlimited() {
        assert!(IntervalLimiter::new(Duration::ZERO).is_none());
        assert_eq!(limiter_for(Duration::ZERO).min_interval(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_first_acquire_is_immediate() {
        let limiter = limiter_for(Duration::from_secs(60));
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_spacing_between_acquires() {
        let limiter = limiter_for(Duration::from_millis(150));
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn test_shared_between_holders() {
        let limiter = limiter_for(Duration::from_millis(100));
        let other = Arc::clone(&limiter);

        let start = Instant::now();
        limiter.acquire().await;
        other.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(170));
    }
}
