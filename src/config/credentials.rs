//! API credential resolution

use serde::{Deserialize, Serialize};

/// Environment variable holding the Brave Search API key
pub const API_KEY_ENV: &str = "BRAVE_API_KEY";

/// Where a provider's credential came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// Passed explicitly by the caller
    Explicit,
    /// Read from the environment
    Environment,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit => write!(f, "user-provided"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// Resolve a credential: explicit value first, then the environment.
/// Blank values count as absent.
pub fn resolve_api_key(explicit: Option<&str>) -> Option<(String, CredentialSource)> {
    resolve_api_key_from(explicit, |key| std::env::var(key).ok())
}

/// Same as [`resolve_api_key`] with an injectable environment lookup
pub fn resolve_api_key_from<F>(
    explicit: Option<&str>,
    lookup: F,
) -> Option<(String, CredentialSource)>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Some((key.to_string(), CredentialSource::Explicit));
    }

    lookup(API_KEY_ENV)
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .map(|k| (k, CredentialSource::Environment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins() {
        let resolved = resolve_api_key_from(Some("abc"), |_| Some("env".to_string()));
        assert_eq!(
            resolved,
            Some(("abc".to_string(), CredentialSource::Explicit))
        );
    }

    #[test]
    fn test_env_fallback() {
        let resolved = resolve_api_key_from(Some("  "), |key| {
            assert_eq!(key, API_KEY_ENV);
            Some(" from-env ".to_string())
        });
        assert_eq!(
            resolved,
            Some(("from-env".to_string(), CredentialSource::Environment))
        );
    }

    #[test]
    fn test_missing_everywhere() {
        assert!(resolve_api_key_from(None, |_| None).is_none());
        assert!(resolve_api_key_from(None, |_| Some(String::new())).is_none());
    }
}
