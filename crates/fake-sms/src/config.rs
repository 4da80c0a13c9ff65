//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use sms_client::{ProviderKind, ProviderOptions, DEFAULT_API_URL, DEFAULT_SCRAPE_URL};
use std::path::PathBuf;
use std::time::Duration;

/// Prefix of every environment variable read by the tool.
pub const ENV_PREFIX: &str = "FAKE_SMS";

/// Application configuration.
///
/// Each field maps to `FAKE_SMS_<FIELD>`, e.g. `FAKE_SMS_DB_DIR`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Registry directory override (defaults to `~/.fake-sms`)
    #[serde(default)]
    pub db_dir: Option<PathBuf>,

    /// Which backend to use
    #[serde(default)]
    pub provider: ProviderKind,

    /// Base URL of the JSON API provider
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the scraped website
    #[serde(default = "default_scrape_url")]
    pub scrape_url: String,

    /// Request timeout; unset means wait indefinitely
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,

    /// Where exported message files are written
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_dir: None,
            provider: ProviderKind::default(),
            api_url: default_api_url(),
            scrape_url: default_scrape_url(),
            timeout: None,
            export_dir: default_export_dir(),
            log_level: default_log_level(),
        }
    }
}

// Default value functions
fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

fn default_scrape_url() -> String {
    DEFAULT_SCRAPE_URL.into()
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Build the configuration from an environment source.
    pub fn from_environment(environment: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            // Phone numbers and paths must stay strings.
            .add_source(environment.try_parsing(false))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Connection settings for the provider.
    pub fn provider_options(&self) -> ProviderOptions {
        ProviderOptions {
            api_url: self.api_url.clone(),
            scrape_url: self.scrape_url.clone(),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_environment(config::Environment::with_prefix(ENV_PREFIX).source(Some(map)))
    }

    #[test]
    fn test_defaults() {
        let config = from_map(&[]).unwrap();

        assert!(config.db_dir.is_none());
        assert_eq!(config.provider, ProviderKind::Api);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.scrape_url, DEFAULT_SCRAPE_URL);
        assert!(config.timeout.is_none());
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_environment_overrides() {
        let config = from_map(&[
            ("FAKE_SMS_DB_DIR", "/tmp/fake-sms-db"),
            ("FAKE_SMS_PROVIDER", "scrape"),
            ("FAKE_SMS_SCRAPE_URL", "http://localhost:9000"),
            ("FAKE_SMS_TIMEOUT", "15s"),
        ])
        .unwrap();

        assert_eq!(config.db_dir, Some(PathBuf::from("/tmp/fake-sms-db")));
        assert_eq!(config.provider, ProviderKind::Scrape);
        assert_eq!(config.scrape_url, "http://localhost:9000");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));

        let options = config.provider_options();
        assert_eq!(options.scrape_url, "http://localhost:9000");
        assert_eq!(options.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_provider_name_is_case_insensitive() {
        let config = from_map(&[("FAKE_SMS_PROVIDER", "Scrape")]).unwrap();
        assert_eq!(config.provider, ProviderKind::Scrape);

        let config = from_map(&[("FAKE_SMS_PROVIDER", "API")]).unwrap();
        assert_eq!(config.provider, ProviderKind::Api);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(from_map(&[("FAKE_SMS_PROVIDER", "pigeon")]).is_err());
    }
}
