//! Configuration for QuoteCore.
//!
//! Loaded from and saved to a JSON file. Every field has a default so a
//! partial (or absent) file still produces a working configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, QuoteResult};

fn default_server_url() -> String {
    "https://jsonplaceholder.typicode.com/posts".to_string()
}

fn default_fetch_limit() -> usize {
    5
}

fn default_sync_interval_secs() -> u64 {
    30
}

fn default_http_timeout_secs() -> u64 {
    30
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint of the remote quote feed (GET to pull, POST to publish)
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// How many feed records one sync pass consumes
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
    /// Seconds between periodic sync passes
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,
    /// HTTP request timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            fetch_limit: default_fetch_limit(),
            sync_interval_secs: default_sync_interval_secs(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file. An absent file yields the
    /// defaults; unreadable JSON is a configuration error.
    pub fn load<P: AsRef<Path>>(path: P) -> QuoteResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| QuoteError::config(format!("invalid config file: {}", e)))
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> QuoteResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.fetch_limit, 5);
        assert_eq!(config.sync_interval(), Duration::from_secs(30));
        assert!(config.server_url.starts_with("https://"));
    }

    #[test]
    fn test_load_absent_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("missing.json")).unwrap();
        assert_eq!(config.sync_interval_secs, 30);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"fetch_limit": 3}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.fetch_limit, 3);
        assert_eq!(config.sync_interval_secs, 30);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.server_url = "http://localhost:9000/posts".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.server_url, "http://localhost:9000/posts");
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{broken").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(QuoteError::Config(_))
        ));
    }
}
