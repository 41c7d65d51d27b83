//! HTTP client for making requests to search APIs

use crate::config::OutgoingSettings;
use anyhow::Result;
use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use tracing::debug;

/// Headers whose values never reach the logs
const SECRET_HEADERS: &[&str] = &["x-subscription-token", "authorization", "x-api-key"];

/// HTTP GET request to a search API
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// URL to request
    pub url: String,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Query parameters, sent in order
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Look up a query parameter
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Headers safe to log
    pub fn redacted_headers(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(k, v)| {
                if SECRET_HEADERS.contains(&k.to_ascii_lowercase().as_str()) {
                    (k.clone(), "<redacted>".to_string())
                } else {
                    (k.clone(), v.clone())
                }
            })
            .collect()
    }
}

/// HTTP response from a search API
#[derive(Debug)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl ApiResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if response indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// First 500 bytes of the body, for logs and error messages
    pub fn snippet(&self) -> String {
        let mut end = self.text.len().min(500);
        while !self.text.is_char_boundary(end) {
            end -= 1;
        }
        let mut snip = self.text[..end].to_string();
        if end < self.text.len() {
            snip.push_str("...");
        }
        snip
    }
}

/// HTTP client wrapper with outgoing-request configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let request_timeout = settings.request_timeout()?;
        let mut builder = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(settings.connect_timeout()?)
            .user_agent(concat!("websearch-rs/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            timeout: request_timeout,
        })
    }

    /// Execute a request. Non-2xx statuses are returned, not raised; only
    /// transport failures are errors.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        debug!(
            url = %request.url,
            params = ?request.params,
            headers = ?request.redacted_headers(),
            timeout_ms = self.timeout.as_millis() as u64,
            "http.request.start"
        );

        let mut req_builder = self.client.get(&request.url);

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        let started = Instant::now();
        let response = req_builder.send().await?;
        let parsed = Self::parse_response(response).await?;

        debug!(
            status = parsed.status,
            duration_ms = started.elapsed().as_millis() as u64,
            body_len = parsed.text.len(),
            "http.response"
        );

        Ok(parsed)
    }

    /// Parse response into ApiResponse
    async fn parse_response(response: Response) -> Result<ApiResponse> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(ApiResponse { status, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_secret_headers_redacted() {
        let request = ApiRequest::get("https://example.com")
            .header("Accept", "application/json")
            .header("X-Subscription-Token", "secret");
        let redacted = request.redacted_headers();
        assert_eq!(redacted[0].1, "application/json");
        assert_eq!(redacted[1].1, "<redacted>");
    }

    #[test]
    fn test_snippet_truncates() {
        let response = ApiResponse {
            status: 200,
            text: "a".repeat(600),
        };
        assert_eq!(response.snippet().len(), 503);
    }

    #[tokio::test]
    async fn test_execute_sends_params_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust"))
            .and(header("X-Test", "yes"))
            .respond_with(ResponseTemplate::new(418).set_body_string("teapot"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = ApiRequest::get(format!("{}/search", server.uri()))
            .header("X-Test", "yes")
            .param("q", "rust");
        let response = client.execute(request).await.unwrap();

        assert_eq!(response.status, 418);
        assert_eq!(response.text, "teapot");
        assert!(!response.is_success());
        assert!(!response.is_rate_limited());
    }

    #[test]
    fn test_rate_limited_status() {
        let response = ApiResponse {
            status: 429,
            text: String::new(),
        };
        assert!(response.is_rate_limited());
        assert!(!response.is_success());
    }

    #[test]
    fn test_unrepresentable_timeout_is_error() {
        let settings = OutgoingSettings {
            request_timeout: f64::INFINITY,
            ..Default::default()
        };
        assert!(HttpClient::with_settings(&settings).is_err());
    }
}
