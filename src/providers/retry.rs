//! Retry policy for rate-limited searches

use crate::error::SearchError;
use crate::results::SearchResult;
use std::time::Duration;

/// Exponential backoff applied to rate-limited attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each later one
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay to wait after the rate-limited attempt `attempt` (starting at 0)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Whether another attempt may follow attempt `attempt`
    pub fn can_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Upper bound on requests made for one search
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}

/// Classified result of a single request
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(Vec<SearchResult>),
    /// Worth trying again after backing off
    Retryable(SearchError),
    /// Abort the search
    Fatal(SearchError),
}

impl From<Result<Vec<SearchResult>, SearchError>> for AttemptOutcome {
    fn from(result: Result<Vec<SearchResult>, SearchError>) -> Self {
        match result {
            Ok(results) => Self::Success(results),
            Err(err) if err.is_retryable() => Self::Retryable(err),
            Err(err) => Self::Fatal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_double() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(5));
        assert_eq!(policy.delay_for(1), Duration::from_secs(10));
        assert_eq!(policy.delay_for(2), Duration::from_secs(20));
        assert_eq!(policy.max_attempts(), 4);
    }

    #[test]
    fn test_delay_saturates() {
        let policy = RetryPolicy::new(100, Duration::from_secs(1));
        assert_eq!(
            policy.delay_for(64),
            Duration::from_secs(u64::from(u32::MAX))
        );
        let huge = RetryPolicy::new(1, Duration::MAX);
        assert_eq!(huge.delay_for(3), Duration::MAX);
    }

    #[test]
    fn test_can_retry() {
        let policy = RetryPolicy::new(2, Duration::from_millis(1));
        assert!(policy.can_retry(0));
        assert!(policy.can_retry(1));
        assert!(!policy.can_retry(2));
        assert!(!RetryPolicy::new(0, Duration::ZERO).can_retry(0));
    }

    #[test]
    fn test_classification() {
        assert!(matches!(
            AttemptOutcome::from(Ok(vec![])),
            AttemptOutcome::Success(_)
        ));
        assert!(matches!(
            AttemptOutcome::from(Err(SearchError::rate_limit("429", "Brave"))),
            AttemptOutcome::Retryable(_)
        ));
        assert!(matches!(
            AttemptOutcome::from(Err(SearchError::auth("401", "Brave"))),
            AttemptOutcome::Fatal(_)
        ));
    }
}
