//! Brave Search API provider (web vertical)

use super::retry::{AttemptOutcome, RetryPolicy};
use super::{ProviderConfig, ProviderOptions, SearchProvider, WEB_PROVIDER};
use crate::config::{resolve_api_key, CredentialSource, ProviderSettings};
use crate::error::SearchError;
use crate::events::{SearchEvent, Sinks, TracingSink};
use crate::network::{ApiRequest, ApiResponse, HttpClient};
use crate::query::{NormalizedQuery, MAX_QUERY_CHARS};
use crate::ratelimit::{limiter_for, RateLimiter};
use crate::results::{SearchOutcome, SearchResult, SkipReason};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, Instrument};
use url::Url;
use uuid::Uuid;

/// Provider identifier carried by errors and events
pub const PROVIDER_NAME: &str = "Brave";

const SUBSCRIPTION_HEADER: &str = "X-Subscription-Token";

/// Brave web search invoker with rate limiting and 429 backoff
pub struct BraveSearchProvider {
    client: HttpClient,
    endpoint: String,
    api_key: String,
    settings: ProviderSettings,
    retry: RetryPolicy,
    limiter: Arc<dyn RateLimiter>,
    sinks: Sinks,
}

impl BraveSearchProvider {
    /// Build a provider, resolving the API key from the options or
    /// `BRAVE_API_KEY`. Fails with a config error when no key is found.
    pub fn new(options: ProviderOptions) -> Result<Self, SearchError> {
        let credential = resolve_api_key(options.explicit_api_key());
        Self::with_credential(options, credential)
    }

    pub(crate) fn with_credential(
        options: ProviderOptions,
        credential: Option<(String, CredentialSource)>,
    ) -> Result<Self, SearchError> {
        let Some((api_key, source)) = credential else {
            return Err(SearchError::config("Missing BRAVE_API_KEY", PROVIDER_NAME));
        };

        let base = Url::parse(&options.settings.base_url).map_err(|e| {
            SearchError::config(
                format!("invalid base URL {}: {}", options.settings.base_url, e),
                PROVIDER_NAME,
            )
        })?;
        let endpoint = format!("{}/web/search", base.as_str().trim_end_matches('/'));

        let client = HttpClient::with_settings(&options.outgoing)
            .map_err(|e| SearchError::config(e.to_string(), PROVIDER_NAME))?;

        let limiter = options
            .rate_limiter
            .unwrap_or_else(|| limiter_for(options.settings.min_interval()));

        let mut sinks = Sinks::new(options.sinks);
        if sinks.is_empty() {
            sinks.push(Arc::new(TracingSink::new(PROVIDER_NAME)));
        }

        let retry = RetryPolicy::new(
            options.settings.max_retries,
            options.settings.retry_delay(),
        );

        sinks.emit(SearchEvent::Initialized {
            provider: PROVIDER_NAME.to_string(),
            credential: source,
        });

        Ok(Self {
            client,
            endpoint,
            api_key,
            settings: options.settings,
            retry,
            limiter,
            sinks,
        })
    }

    fn build_request(&self, query: &str) -> ApiRequest {
        let s = &self.settings;
        ApiRequest::get(&self.endpoint)
            .header("Accept", "application/json")
            .header(SUBSCRIPTION_HEADER, &self.api_key)
            .param("q", query)
            .param("count", s.count)
            .param("offset", s.offset)
            .param("language", &s.language)
            .param("country", &s.country)
            .param("safesearch", s.safesearch)
            .param("format", "json")
    }

    /// One rate-limited request, classified for the retry loop
    async fn attempt(&self, query: &str, attempt: u32) -> AttemptOutcome {
        self.limiter.acquire().await;
        self.sinks.emit(SearchEvent::Requesting {
            query: query.to_string(),
            attempt,
        });

        let response = match self.client.execute(self.build_request(query)).await {
            Ok(response) => response,
            Err(e) => {
                let message = e.to_string();
                let message = if message.is_empty() {
                    "Brave request failed".to_string()
                } else {
                    message
                };
                return AttemptOutcome::Fatal(SearchError::api(message, PROVIDER_NAME));
            }
        };

        AttemptOutcome::from(self.map_response(&response))
    }

    fn map_response(&self, response: &ApiResponse) -> Result<Vec<SearchResult>, SearchError> {
        match response.status {
            _ if response.is_rate_limited() => {
                Err(SearchError::rate_limit("Rate-limited by Brave", PROVIDER_NAME))
            }
            422 => {
                debug!(body = %response.snippet(), "Brave rejected query parameters");
                Err(SearchError::api("Received HTTP 422 from Brave.", PROVIDER_NAME))
            }
            401 => Err(SearchError::auth("Invalid Brave API Key", PROVIDER_NAME)),
            _ if !response.is_success() => Err(SearchError::api(
                format!(
                    "HTTP {} from Brave: {}",
                    response.status,
                    extract_error_message(&response.text)
                ),
                PROVIDER_NAME,
            )),
            _ => match parse_results(&response.text) {
                Some(results) => Ok(results),
                None => {
                    self.sinks.emit(SearchEvent::UnexpectedShape {
                        body_snippet: response.snippet(),
                    });
                    Ok(Vec::new())
                }
            },
        }
    }

    async fn run(&self, raw: &str) -> Result<SearchOutcome, SearchError> {
        self.sinks.emit(SearchEvent::QueryReceived {
            query: raw.to_string(),
        });

        let query = match NormalizedQuery::parse(raw) {
            NormalizedQuery::TooShort => {
                self.sinks.emit(SearchEvent::QueryTooShort);
                return Ok(SearchOutcome::Skipped(SkipReason::QueryTooShort));
            }
            NormalizedQuery::Ready {
                query,
                truncated_from,
            } => {
                if let Some(from) = truncated_from {
                    self.sinks.emit(SearchEvent::QueryTruncated {
                        from,
                        to: MAX_QUERY_CHARS,
                    });
                }
                query
            }
        };

        let mut attempt = 0u32;
        loop {
            match self.attempt(&query, attempt).await {
                AttemptOutcome::Success(results) => {
                    if results.is_empty() {
                        self.sinks.emit(SearchEvent::EmptyResults {
                            query: query.clone(),
                        });
                    }
                    self.sinks.emit(SearchEvent::Completed {
                        count: results.len(),
                        attempts: attempt + 1,
                    });
                    return Ok(SearchOutcome::Completed(results));
                }
                AttemptOutcome::Retryable(_) if self.retry.can_retry(attempt) => {
                    let delay = self.retry.delay_for(attempt);
                    self.sinks
                        .emit(SearchEvent::RateLimited { attempt, delay });
                    sleep(delay).await;
                    attempt += 1;
                }
                AttemptOutcome::Retryable(_) => {
                    self.sinks.emit(SearchEvent::RetriesExhausted {
                        attempts: attempt + 1,
                    });
                    return Err(SearchError::rate_limit(
                        "Exceeded maximum retries due to rate limiting",
                        PROVIDER_NAME,
                    ));
                }
                AttemptOutcome::Fatal(error) => {
                    self.sinks.emit(SearchEvent::Failed {
                        error: error.clone(),
                        attempts: attempt + 1,
                    });
                    return Err(error);
                }
            }
        }
    }
}

impl std::fmt::Debug for BraveSearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BraveSearchProvider")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("retry", &self.retry)
            .field("min_interval", &self.limiter.min_interval())
            .finish()
    }
}

#[async_trait]
impl SearchProvider for BraveSearchProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn kind(&self) -> &str {
        WEB_PROVIDER
    }

    fn config(&self) -> ProviderConfig {
        ProviderConfig {
            api_key_present: !self.api_key.is_empty(),
            max_retries: self.retry.max_retries,
            base_retry_delay_ms: self.retry.base_delay.as_millis() as u64,
            min_interval_ms: self.limiter.min_interval().as_millis() as u64,
        }
    }

    async fn search_outcome(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let span = tracing::info_span!("search", id = %Uuid::new_v4(), provider = PROVIDER_NAME);
        self.run(query).instrument(span).await
    }
}

// ==============================
// Response shapes
// ==============================

#[derive(Debug, Deserialize)]
struct WebSearchApiResponse {
    #[serde(default)]
    web: Option<WebSection>,
}

#[derive(Debug, Deserialize)]
struct WebSection {
    #[serde(default)]
    results: Option<Vec<WebResult>>,
}

#[derive(Debug, Deserialize)]
struct WebResult {
    #[serde(default, deserialize_with = "string_or_none")]
    title: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    description: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    url: Option<String>,
}

/// Non-string field values are treated as missing
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Map a success body to results; `None` when the body lacks `web.results`
fn parse_results(body: &str) -> Option<Vec<SearchResult>> {
    let parsed: WebSearchApiResponse = serde_json::from_str(body).ok()?;
    let results = parsed.web?.results?;
    Some(
        results
            .into_iter()
            .map(|r| SearchResult::web(r.title, r.description, r.url))
            .collect(),
    )
}

/// Pull a readable message out of an error body
fn extract_error_message(body: &str) -> String {
    // Brave: {"type":"ErrorResponse","error":{"detail":"...","code":"..."}}
    #[derive(Deserialize)]
    struct Envelope {
        error: Detail,
    }
    #[derive(Deserialize)]
    struct Detail {
        #[serde(default)]
        detail: String,
        #[serde(default)]
        code: String,
    }

    // Generic: {"message":"..."}
    #[derive(Deserialize)]
    struct Msg {
        message: String,
    }

    if let Ok(env) = serde_json::from_str::<Envelope>(body) {
        if !env.error.detail.is_empty() {
            return env.error.detail;
        }
        if !env.error.code.is_empty() {
            return env.error.code;
        }
    }
    if let Ok(m) = serde_json::from_str::<Msg>(body) {
        return m.message;
    }

    let mut snip: String = body.chars().take(200).collect();
    if snip.len() < body.len() {
        snip.push_str("...");
    }
    snip
}
