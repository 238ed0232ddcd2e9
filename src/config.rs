//! Application configuration loaded from environment variables.

use crate::store::PostStore;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Data file override (JSON); the built-in sample is used when unset
pub const DATA_ENV: &str = "PHOTO_DIARY_DATA";
pub const HOST_ENV: &str = "PHOTO_DIARY_HOST";
pub const PORT_ENV: &str = "PHOTO_DIARY_PORT";
pub const ASSETS_ENV: &str = "PHOTO_DIARY_ASSETS";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    /// Directory served under /static (post and avatar images)
    pub assets_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (environment, tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            data_path: lookup(DATA_ENV)
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            host: lookup(HOST_ENV).unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup(PORT_ENV)
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            assets_dir: lookup(ASSETS_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The configured post store: data file when set, sample data otherwise
    pub fn load_store(&self) -> Result<PostStore> {
        match &self.data_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading diary data file");
                PostStore::load(path)
                    .with_context(|| format!("Failed to load diary data from {}", path.display()))
            }
            None => Ok(PostStore::sample()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert!(config.data_path.is_none());
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.assets_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (DATA_ENV, "/tmp/diary.json"),
            (HOST_ENV, "0.0.0.0"),
            (PORT_ENV, "8080"),
            (ASSETS_ENV, "/srv/photos"),
        ]));

        assert_eq!(config.data_path, Some(PathBuf::from("/tmp/diary.json")));
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.assets_dir, PathBuf::from("/srv/photos"));
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = AppConfig::from_lookup(lookup_from(&[(PORT_ENV, "not-a-port")]));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_blank_data_path_means_sample() {
        let config = AppConfig::from_lookup(lookup_from(&[(DATA_ENV, "  ")]));
        assert!(config.data_path.is_none());

        let store = config.load_store().unwrap();
        assert_eq!(store.posts().len(), 6);
    }

    #[test]
    fn test_missing_data_file_reports_path() {
        let config = AppConfig::from_lookup(lookup_from(&[(DATA_ENV, "/no/such/diary.json")]));
        let err = config.load_store().unwrap_err();

        assert!(err.to_string().contains("/no/such/diary.json"));
    }
}
