//! Settings structures for WebSearch-RS configuration

use crate::query::SafeSearch;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub outgoing: OutgoingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (WEBSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_env_from(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary variable lookup
    pub fn merge_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("WEBSEARCH_PROVIDER") {
            self.provider.kind = val;
        }
        if let Some(val) = lookup("WEBSEARCH_BASE_URL") {
            self.provider.base_url = val;
        }
        if let Some(val) = lookup("WEBSEARCH_MAX_RETRIES") {
            if let Ok(n) = val.parse() {
                self.provider.max_retries = n;
            }
        }
        if let Some(val) = lookup("WEBSEARCH_RETRY_DELAY_MS") {
            if let Ok(ms) = val.parse() {
                self.provider.retry_delay_ms = ms;
            }
        }
        if let Some(val) = lookup("WEBSEARCH_MIN_INTERVAL_MS") {
            if let Ok(ms) = val.parse() {
                self.provider.min_interval_ms = ms;
            }
        }
        if let Some(val) = lookup("WEBSEARCH_REQUEST_TIMEOUT") {
            if let Ok(secs) = val.parse() {
                self.outgoing.request_timeout = secs;
            }
        }
    }
}

/// Search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Provider type tag passed to the factory
    #[serde(rename = "type")]
    pub kind: String,
    /// API key; falls back to BRAVE_API_KEY when absent
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Retries after a rate-limited attempt
    pub max_retries: u32,
    /// Base backoff delay, doubled on every retry
    pub retry_delay_ms: u64,
    /// Minimum spacing between outbound calls
    pub min_interval_ms: u64,
    /// Results requested per call
    pub count: u32,
    /// Result offset
    pub offset: u32,
    /// Search language code
    pub language: String,
    /// Country code
    pub country: String,
    /// Safe search level
    pub safesearch: SafeSearch,
}

impl ProviderSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: "web".to_string(),
            api_key: None,
            base_url: "https://api.search.brave.com/res/v1".to_string(),
            max_retries: 3,
            retry_delay_ms: 5_000,
            min_interval_ms: 10_000,
            count: 10,
            offset: 0,
            language: "en".to_string(),
            country: "US".to_string(),
            safesearch: SafeSearch::Moderate,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Connect timeout in seconds
    pub connect_timeout: f64,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl OutgoingSettings {
    pub fn request_timeout(&self) -> Result<Duration> {
        seconds("request_timeout", self.request_timeout)
    }

    pub fn connect_timeout(&self) -> Result<Duration> {
        seconds("connect_timeout", self.connect_timeout)
    }
}

/// Negative and NaN values clamp to zero; infinite or overflowing ones fail
fn seconds(name: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs.max(0.0))
        .with_context(|| format!("outgoing.{} out of range: {}", name, secs))
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 15.0,
            connect_timeout: 5.0,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.provider.kind, "web");
        assert_eq!(settings.provider.max_retries, 3);
        assert_eq!(settings.provider.retry_delay(), Duration::from_secs(5));
        assert_eq!(settings.provider.min_interval(), Duration::from_secs(10));
        assert_eq!(settings.provider.count, 10);
        assert_eq!(
            settings.outgoing.request_timeout().unwrap(),
            Duration::from_secs(15)
        );
        assert_eq!(
            settings.outgoing.connect_timeout().unwrap(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_timeout_out_of_range() {
        let mut settings = Settings::default();
        settings.merge_env_from(|key| {
            (key == "WEBSEARCH_REQUEST_TIMEOUT").then(|| "inf".to_string())
        });
        assert!(settings.outgoing.request_timeout().is_err());

        let settings = Settings::from_yaml("outgoing:\n  connect_timeout: 1e30\n").unwrap();
        let err = settings.outgoing.connect_timeout().unwrap_err();
        assert!(err.to_string().contains("connect_timeout"));

        let settings = Settings::from_yaml("outgoing:\n  request_timeout: -3\n").unwrap();
        assert_eq!(settings.outgoing.request_timeout().unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
provider:
  max_retries: 5
  safesearch: strict
outgoing:
  request_timeout: 2.5
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.provider.max_retries, 5);
        assert_eq!(settings.provider.safesearch, SafeSearch::Strict);
        assert_eq!(settings.provider.language, "en");
        assert_eq!(settings.outgoing.request_timeout, 2.5);
        assert!(settings.outgoing.verify_ssl);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("WEBSEARCH_PROVIDER", "news"),
            ("WEBSEARCH_MAX_RETRIES", "1"),
            ("WEBSEARCH_MIN_INTERVAL_MS", "0"),
            ("WEBSEARCH_RETRY_DELAY_MS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.merge_env_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.provider.kind, "news");
        assert_eq!(settings.provider.max_retries, 1);
        assert_eq!(settings.provider.min_interval_ms, 0);
        assert_eq!(settings.provider.retry_delay_ms, 5_000);
    }
}
