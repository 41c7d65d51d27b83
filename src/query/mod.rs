//! Query normalization
//!
//! Queries are trimmed, rejected when too short to be meaningful, and
//! truncated to the provider's maximum accepted length. Lengths are counted
//! in characters so truncation never splits a code point.

use serde::{Deserialize, Serialize};

/// Minimum number of characters a trimmed query must have
pub const MIN_QUERY_CHARS: usize = 3;

/// Maximum number of characters sent to the provider
pub const MAX_QUERY_CHARS: usize = 1000;

/// Result of normalizing a raw query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedQuery {
    /// Too short after trimming; no request should be made
    TooShort,
    /// Ready to send
    Ready {
        query: String,
        /// Character count before truncation, when truncation happened
        truncated_from: Option<usize>,
    },
}

impl NormalizedQuery {
    /// Normalize a raw user query
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();

        if len < MIN_QUERY_CHARS {
            return Self::TooShort;
        }

        if len > MAX_QUERY_CHARS {
            let query: String = trimmed.chars().take(MAX_QUERY_CHARS).collect();
            return Self::Ready {
                query,
                truncated_from: Some(len),
            };
        }

        Self::Ready {
            query: trimmed.to_string(),
            truncated_from: None,
        }
    }
}

/// Safe search level understood by the provider
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    Off,
    #[default]
    Moderate,
    Strict,
}

impl SafeSearch {
    /// Get the string representation for API calls
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Moderate => "moderate",
            Self::Strict => "strict",
        }
    }
}

impl std::fmt::Display for SafeSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
