//! Error taxonomy for search providers

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of a search failure, without the message payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or unusable configuration (construction time)
    Config,
    /// Provider answered with HTTP 429
    RateLimit,
    /// Any other request-level failure
    Api,
    /// Provider rejected the credential
    Auth,
    /// Factory was asked for a provider type it does not know
    UnsupportedProvider,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config => write!(f, "config_error"),
            Self::RateLimit => write!(f, "rate_limit"),
            Self::Api => write!(f, "api_error"),
            Self::Auth => write!(f, "auth_error"),
            Self::UnsupportedProvider => write!(f, "unsupported_provider"),
        }
    }
}

/// Error returned by providers and the provider factory
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("[{provider}] configuration error: {message}")]
    Config { message: String, provider: String },

    #[error("[{provider}] rate limited: {message}")]
    RateLimit { message: String, provider: String },

    #[error("[{provider}] api error: {message}")]
    Api { message: String, provider: String },

    #[error("[{provider}] authentication error: {message}")]
    Auth { message: String, provider: String },

    #[error("unsupported provider: {message}")]
    UnsupportedProvider { message: String, provider: String },
}

impl SearchError {
    pub fn config(message: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            provider: provider.into(),
        }
    }

    pub fn rate_limit(message: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
            provider: provider.into(),
        }
    }

    pub fn api(message: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            provider: provider.into(),
        }
    }

    pub fn auth(message: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
            provider: provider.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedProvider {
            message: message.into(),
            provider: String::new(),
        }
    }

    /// The kind tag of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Api { .. } => ErrorKind::Api,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::UnsupportedProvider { .. } => ErrorKind::UnsupportedProvider,
        }
    }

    /// Human-readable message, without the provider prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Config { message, .. }
            | Self::RateLimit { message, .. }
            | Self::Api { message, .. }
            | Self::Auth { message, .. }
            | Self::UnsupportedProvider { message, .. } => message,
        }
    }

    /// Identifier of the provider that raised the error (empty for factory errors)
    pub fn provider(&self) -> &str {
        match self {
            Self::Config { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::Api { provider, .. }
            | Self::Auth { provider, .. }
            | Self::UnsupportedProvider { provider, .. } => provider,
        }
    }

    /// Only rate-limit responses are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimit { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let err = SearchError::auth("Invalid Brave API Key", "Brave");
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(err.message(), "Invalid Brave API Key");
        assert_eq!(err.provider(), "Brave");
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "[Brave] authentication error: Invalid Brave API Key"
        );
    }

    #[test]
    fn test_only_rate_limit_is_retryable() {
        assert!(SearchError::rate_limit("slow down", "Brave").is_retryable());
        assert!(!SearchError::api("boom", "Brave").is_retryable());
        assert!(!SearchError::config("missing", "Brave").is_retryable());
    }

    #[test]
    fn test_unsupported_has_empty_provider() {
        let err = SearchError::unsupported("No provider for type: images");
        assert_eq!(err.kind(), ErrorKind::UnsupportedProvider);
        assert_eq!(err.provider(), "");
        assert_eq!(ErrorKind::UnsupportedProvider.to_string(), "unsupported_provider");
    }
}
