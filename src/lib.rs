//! WebSearch-RS: a rate-limited, retrying web search API client
//!
//! A [`SearchProvider`] turns a free-text query into normalized
//! [`SearchResult`]s by calling the Brave Search API, spacing calls through an
//! injectable [`RateLimiter`] and backing off exponentially on HTTP 429.

pub mod config;
pub mod error;
pub mod events;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod query;
pub mod ratelimit;
pub mod results;

pub use config::Settings;
pub use error::{ErrorKind, SearchError};
pub use events::{SearchEvent, SearchSink};
pub use providers::{
    create_provider, create_provider_from, ProviderConfig, ProviderOptions, SearchProvider,
};
pub use ratelimit::RateLimiter;
pub use results::{SearchOutcome, SearchResult};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
