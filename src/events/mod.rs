//! Search lifecycle events and injectable sinks
//!
//! Providers report what they do through [`SearchSink`]s handed to them at
//! construction instead of writing to global output streams. The default
//! sink forwards to `tracing`.

use crate::config::CredentialSource;
use crate::error::SearchError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, info, warn};

/// Something that happened while serving a search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// Provider finished construction
    Initialized {
        provider: String,
        credential: CredentialSource,
    },
    /// A search was requested
    QueryReceived { query: String },
    /// Query was too short after trimming; no request made
    QueryTooShort,
    /// Query exceeded the maximum length and was cut
    QueryTruncated { from: usize, to: usize },
    /// An attempt is about to be sent (attempt starts at 0)
    Requesting { query: String, attempt: u32 },
    /// Provider answered 429; waiting `delay` before the next attempt
    RateLimited { attempt: u32, delay: Duration },
    /// Success response body did not have the expected shape
    UnexpectedShape { body_snippet: String },
    /// Well-formed response without results
    EmptyResults { query: String },
    /// Search finished with results
    Completed { count: usize, attempts: u32 },
    /// Search aborted with a non-retryable error
    Failed { error: SearchError, attempts: u32 },
    /// Every attempt was rate limited
    RetriesExhausted { attempts: u32 },
}

/// Receiver of search events
pub trait SearchSink: Send + Sync {
    fn record(&self, event: &SearchEvent);
}

/// Sink that logs events through `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    provider: String,
}

impl TracingSink {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }
}

impl SearchSink for TracingSink {
    fn record(&self, event: &SearchEvent) {
        let provider = self.provider.as_str();
        match event {
            SearchEvent::Initialized {
                provider: name,
                credential,
            } => {
                info!(provider = %name, "Initialized using {} API key", credential);
            }
            SearchEvent::QueryReceived { query } => {
                info!(provider, "Original query: \"{}\"", query);
            }
            SearchEvent::QueryTooShort => {
                info!(provider, "Query too short, skipping search");
            }
            SearchEvent::QueryTruncated { from, to } => {
                info!(provider, "Query truncated from {} to {} characters", from, to);
            }
            SearchEvent::Requesting { query, attempt } => {
                info!(provider, attempt, "Searching for: \"{}\"", query);
            }
            SearchEvent::RateLimited { attempt, delay } => {
                warn!(
                    provider,
                    "Rate-limited, waiting {:.1}s before retry (attempt {})",
                    delay.as_secs_f64(),
                    attempt + 1
                );
            }
            SearchEvent::UnexpectedShape { body_snippet } => {
                error!(provider, body = %body_snippet, "Unexpected response shape");
            }
            SearchEvent::EmptyResults { query } => {
                warn!(provider, "API returned 0 results for \"{}\"", query);
            }
            SearchEvent::Completed { count, attempts } => {
                info!(provider, count, attempts, "Search completed");
            }
            SearchEvent::Failed { error, attempts } => {
                error!(provider, kind = %error.kind(), attempts, "Search aborted: {}", error);
            }
            SearchEvent::RetriesExhausted { attempts } => {
                error!(provider, attempts, "Exceeded maximum retries");
            }
        }
    }
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SearchSink for NullSink {
    fn record(&self, _event: &SearchEvent) {}
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<SearchEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events recorded so far
    pub fn events(&self) -> Vec<SearchEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Backoff delays reported by `RateLimited` events, in order
    pub fn backoff_delays(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SearchEvent::RateLimited { delay, .. } => Some(delay),
                _ => None,
            })
            .collect()
    }

    /// Number of `Requesting` events, i.e. attempts sent
    pub fn attempts(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, SearchEvent::Requesting { .. }))
            .count()
    }
}

impl SearchSink for MemorySink {
    fn record(&self, event: &SearchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Fan-out over every sink a provider was given
#[derive(Clone, Default)]
pub struct Sinks {
    sinks: Vec<Arc<dyn SearchSink>>,
}

impl Sinks {
    pub fn new(sinks: Vec<Arc<dyn SearchSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn SearchSink>) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn emit(&self, event: SearchEvent) {
        for sink in &self.sinks {
            sink.record(&event);
        }
    }
}
