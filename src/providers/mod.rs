//! Search provider module
//!
//! Defines the [`SearchProvider`] trait, the options providers are built
//! from, and the factory that picks a concrete provider by type tag.

mod brave;
mod retry;

pub use brave::{BraveSearchProvider, PROVIDER_NAME as BRAVE_PROVIDER_NAME};
pub use retry::{AttemptOutcome, RetryPolicy};

use crate::config::{resolve_api_key_from, OutgoingSettings, ProviderSettings, Settings};
use crate::error::SearchError;
use crate::events::SearchSink;
use crate::ratelimit::RateLimiter;
use crate::results::{SearchOutcome, SearchResult};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Type tag of the web search provider
pub const WEB_PROVIDER: &str = "web";

/// Effective, immutable configuration of a constructed provider
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key_present: bool,
    pub max_retries: u32,
    pub base_retry_delay_ms: u64,
    pub min_interval_ms: u64,
}

/// Main provider trait that all search invokers implement
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider identifier used in errors and logs
    fn name(&self) -> &str;

    /// Type tag this provider serves
    fn kind(&self) -> &str;

    /// Effective configuration
    fn config(&self) -> ProviderConfig;

    /// Run a search, telling skipped queries apart from empty result sets
    async fn search_outcome(&self, query: &str) -> Result<SearchOutcome, SearchError>;

    /// Run a search; skipped queries yield an empty list
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.search_outcome(query)
            .await
            .map(SearchOutcome::into_results)
    }
}

/// Everything needed to construct a provider
#[derive(Clone)]
pub struct ProviderOptions {
    /// Provider type tag
    pub kind: String,
    /// Explicit API key; takes precedence over settings and environment
    pub api_key: Option<String>,
    pub settings: ProviderSettings,
    pub outgoing: OutgoingSettings,
    /// Shared limiter; one is built from `settings.min_interval_ms` when absent
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    /// Event sinks; a tracing sink is used when empty
    pub sinks: Vec<Arc<dyn SearchSink>>,
}

impl ProviderOptions {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            api_key: None,
            settings: ProviderSettings::default(),
            outgoing: OutgoingSettings::default(),
            rate_limiter: None,
            sinks: Vec::new(),
        }
    }

    /// Options matching a loaded settings file
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            kind: settings.provider.kind.clone(),
            settings: settings.provider.clone(),
            outgoing: settings.outgoing.clone(),
            ..Self::new(WEB_PROVIDER)
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn settings(mut self, settings: ProviderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn outgoing(mut self, outgoing: OutgoingSettings) -> Self {
        self.outgoing = outgoing;
        self
    }

    pub fn rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn SearchSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Explicit key, falling back to the one in settings
    pub(crate) fn explicit_api_key(&self) -> Option<&str> {
        self.api_key.as_deref().or(self.settings.api_key.as_deref())
    }
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self::new(WEB_PROVIDER)
    }
}

/// Create a provider for the requested type tag
pub fn create_provider(options: ProviderOptions) -> Result<Box<dyn SearchProvider>, SearchError> {
    create_provider_from(options, |key| std::env::var(key).ok())
}

/// Same as [`create_provider`], reading `BRAVE_API_KEY` through `lookup`
pub fn create_provider_from<F>(
    options: ProviderOptions,
    lookup: F,
) -> Result<Box<dyn SearchProvider>, SearchError>
where
    F: Fn(&str) -> Option<String>,
{
    let kind = options.kind.clone();
    match kind.as_str() {
        WEB_PROVIDER => {
            let credential = resolve_api_key_from(options.explicit_api_key(), lookup);
            match BraveSearchProvider::with_credential(options, credential) {
                Ok(provider) => {
                    info!("Created provider: {}", provider.name());
                    Ok(Box::new(provider))
                }
                Err(e) => {
                    error!("Error creating {} provider: {}", BRAVE_PROVIDER_NAME, e);
                    Err(e)
                }
            }
        }
        other => Err(SearchError::unsupported(format!(
            "No provider for type: {}",
            other
        ))),
    }
}

/// Get list of available provider type tags
pub fn available_providers() -> Vec<&'static str> {
    vec![WEB_PROVIDER]
}
