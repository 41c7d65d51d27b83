//! Metrics collection module
//!
//! Counts searches, attempts and failures from the event stream.

use crate::error::ErrorKind;
use crate::events::{SearchEvent, SearchSink};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Search metrics collector, usable as a [`SearchSink`]
pub struct SearchMetrics {
    /// Total searches requested
    total_searches: AtomicU64,
    /// Requests actually sent
    attempts: AtomicU64,
    /// Searches skipped because the query was too short
    skipped: AtomicU64,
    /// 429 responses seen
    rate_limited: AtomicU64,
    /// Completed searches that returned nothing
    empty_results: AtomicU64,
    /// Results handed back to callers
    results_returned: AtomicU64,
    /// Failures by error kind
    failures: RwLock<HashMap<ErrorKind, u64>>,
}

impl SearchMetrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            attempts: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            rate_limited: AtomicU64::new(0),
            empty_results: AtomicU64::new(0),
            results_returned: AtomicU64::new(0),
            failures: RwLock::new(HashMap::new()),
        }
    }

    /// Record a failure of the given kind
    pub fn record_failure(&self, kind: ErrorKind) {
        if let Ok(mut failures) = self.failures.write() {
            *failures.entry(kind).or_insert(0) += 1;
        }
    }

    /// Get total searches
    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Get the failure count for one kind
    pub fn get_failures(&self, kind: ErrorKind) -> u64 {
        self.failures
            .read()
            .ok()
            .and_then(|failures| failures.get(&kind).copied())
            .unwrap_or(0)
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let failures: HashMap<String, u64> = self
            .failures
            .read()
            .map(|f| f.iter().map(|(k, v)| (k.to_string(), *v)).collect())
            .unwrap_or_default();

        MetricsSnapshot {
            searches: self.total_searches.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            empty_results: self.empty_results.load(Ordering::Relaxed),
            results_returned: self.results_returned.load(Ordering::Relaxed),
            failures,
        }
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSink for SearchMetrics {
    fn record(&self, event: &SearchEvent) {
        match event {
            SearchEvent::QueryReceived { .. } => {
                self.total_searches.fetch_add(1, Ordering::Relaxed);
            }
            SearchEvent::QueryTooShort => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
            }
            SearchEvent::Requesting { .. } => {
                self.attempts.fetch_add(1, Ordering::Relaxed);
            }
            SearchEvent::RateLimited { .. } => {
                self.rate_limited.fetch_add(1, Ordering::Relaxed);
            }
            SearchEvent::EmptyResults { .. } => {
                self.empty_results.fetch_add(1, Ordering::Relaxed);
            }
            SearchEvent::Completed { count, .. } => {
                self.results_returned
                    .fetch_add(*count as u64, Ordering::Relaxed);
            }
            SearchEvent::Failed { error, .. } => self.record_failure(error.kind()),
            SearchEvent::RetriesExhausted { .. } => {
                // the final 429 has no RateLimited event of its own
                self.rate_limited.fetch_add(1, Ordering::Relaxed);
                self.record_failure(ErrorKind::RateLimit);
            }
            _ => {}
        }
    }
}

/// Serializable view of [`SearchMetrics`]
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub searches: u64,
    pub attempts: u64,
    pub skipped: u64,
    pub rate_limited: u64,
    pub empty_results: u64,
    pub results_returned: u64,
    pub failures: HashMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use std::time::Duration;

    #[test]
    fn test_metrics() {
        let metrics = SearchMetrics::new();

        metrics.record(&SearchEvent::QueryReceived {
            query: "rust".to_string(),
        });
        metrics.record(&SearchEvent::Requesting {
            query: "rust".to_string(),
            attempt: 0,
        });
        metrics.record(&SearchEvent::RateLimited {
            attempt: 0,
            delay: Duration::from_millis(1),
        });
        metrics.record(&SearchEvent::Requesting {
            query: "rust".to_string(),
            attempt: 1,
        });
        metrics.record(&SearchEvent::Completed {
            count: 7,
            attempts: 2,
        });

        let snapshot = metrics.snapshot();
        assert_eq!(metrics.get_total_searches(), 1);
        assert_eq!(snapshot.attempts, 2);
        assert_eq!(snapshot.rate_limited, 1);
        assert_eq!(snapshot.results_returned, 7);
        assert!(snapshot.failures.is_empty());
    }

    #[test]
    fn test_failures_by_kind() {
        let metrics = SearchMetrics::new();
        metrics.record(&SearchEvent::Failed {
            error: SearchError::auth("Invalid Brave API Key", "Brave"),
            attempts: 1,
        });
        metrics.record(&SearchEvent::RetriesExhausted { attempts: 4 });
        metrics.record(&SearchEvent::QueryTooShort);

        assert_eq!(metrics.get_failures(ErrorKind::Auth), 1);
        assert_eq!(metrics.get_failures(ErrorKind::RateLimit), 1);
        assert_eq!(metrics.get_failures(ErrorKind::Api), 0);
        assert_eq!(metrics.snapshot().skipped, 1);
        assert_eq!(metrics.snapshot().failures.get("auth_error"), Some(&1));
    }
}
