//! Configuration module for WebSearch-RS
//!
//! Handles loading settings from YAML files and environment variables, and
//! resolving the provider credential.

mod credentials;
mod settings;

pub use credentials::*;
pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable pointing at a settings file
pub const SETTINGS_PATH_ENV: &str = "WEBSEARCH_SETTINGS_PATH";

/// Load settings from an explicit path, the environment, a default location,
/// or fall back to defaults. Environment overrides are applied last.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match find_settings_file(explicit) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    Ok(settings)
}

fn find_settings_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let candidates = [
        Some(PathBuf::from("settings.yml")),
        Some(PathBuf::from("config/settings.yml")),
        dirs::config_dir().map(|p| p.join("websearch-rs/settings.yml")),
    ];

    candidates.into_iter().flatten().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = load_settings(Some(Path::new("/nonexistent/websearch.yml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let path = std::env::temp_dir().join(format!(
            "websearch-settings-{}.yml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, "provider:\n  count: 20\n").unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.provider.count, 20);
    }
}
