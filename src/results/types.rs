//! Result type definitions

use serde::{Deserialize, Serialize};

/// Placeholder used when the provider omits a result title
pub const DEFAULT_TITLE: &str = "Untitled";

/// Placeholder used when the provider omits a result description
pub const DEFAULT_CONTENT: &str = "No description available";

/// A single normalized search result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    /// The title of the result
    pub title: String,
    /// Content snippet/description
    pub content: String,
    /// Where the result came from (the result URL)
    pub source: String,
    /// Result type
    #[serde(rename = "type")]
    pub result_type: ResultType,
    /// The URL of the result
    pub url: String,
}

impl SearchResult {
    /// Create a web result, substituting placeholders for missing fields
    pub fn web(title: Option<String>, content: Option<String>, url: Option<String>) -> Self {
        let url = url.unwrap_or_default();
        Self {
            title: non_empty(title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content: non_empty(content).unwrap_or_else(|| DEFAULT_CONTENT.to_string()),
            source: url.clone(),
            result_type: ResultType::Web,
            url,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Type of result
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    #[default]
    Web,
}

/// Why a search was not sent to the provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer than the minimum number of characters after trimming
    QueryTooShort,
}

/// Outcome of a search that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// No request was made
    Skipped(SkipReason),
    /// The provider answered; the list may be empty
    Completed(Vec<SearchResult>),
}

impl SearchOutcome {
    /// Flatten into the result list; skipped searches yield no results
    pub fn into_results(self) -> Vec<SearchResult> {
        match self {
            Self::Skipped(_) => Vec::new(),
            Self::Completed(results) => results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        let result = SearchResult::web(None, None, None);
        assert_eq!(result.title, DEFAULT_TITLE);
        assert_eq!(result.content, DEFAULT_CONTENT);
        assert_eq!(result.url, "");
        assert_eq!(result.source, "");
        assert_eq!(result.result_type, ResultType::Web);
    }

    #[test]
    fn test_empty_strings_use_placeholders() {
        let result = SearchResult::web(
            Some(String::new()),
            Some(String::new()),
            Some("https://example.com".to_string()),
        );
        assert_eq!(result.title, DEFAULT_TITLE);
        assert_eq!(result.content, DEFAULT_CONTENT);
        assert_eq!(result.source, "https://example.com");
    }

    #[test]
    fn test_serializes_type_field() {
        let result = SearchResult::web(
            Some("Rust".to_string()),
            Some("A language".to_string()),
            Some("https://www.rust-lang.org".to_string()),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "web");
        assert_eq!(json["source"], "https://www.rust-lang.org");
    }

    #[test]
    fn test_outcome_flattening() {
        assert!(SearchOutcome::Skipped(SkipReason::QueryTooShort)
            .into_results()
            .is_empty());
        let outcome = SearchOutcome::Completed(vec![SearchResult::web(None, None, None)]);
        assert_eq!(outcome.into_results().len(), 1);
    }
}
