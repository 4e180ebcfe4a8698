//! # Configuration Management
//!
//! This module handles loading and saving CLI configuration: the API server,
//! the default username and transport settings.
//!
//! ## Configuration File Location
//!
//! All platforms: `$HOME/.config/rips/config.json`, or
//! `$XDG_CONFIG_HOME/rips/config.json` when that variable is set.
//!
//! Passwords are never stored; the CLI reads them from `--password` or the
//! `RIPS_PASSWORD` environment variable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::{ApiClient, ApiClientBuilder, DEFAULT_BASE_URL};

/// Environment variable for overriding the base URL
const BASE_URL_ENV_VAR: &str = "RIPS_BASE_URL";

/// CLI configuration
///
/// # Example
///
/// ```rust,no_run
/// use rips_api::config::Config;
///
/// let mut config = Config::new_with_url("https://rips.example.com/api".to_string());
/// config.username = Some("alice".to_string());
/// config.save().expect("Failed to save config");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL for the API (stored in config file)
    #[serde(default = "stored_default_base_url")]
    stored_base_url: String,
    /// Default username for login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Cookie jar file, so sessions survive between invocations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_file: Option<PathBuf>,
    /// Additional trusted root certificate (PEM)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_certificate: Option<PathBuf>,
    /// Public suffix list; cookies scoped to a listed suffix are refused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_suffix_list: Option<PathBuf>,
    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Default base URL for storage (without env var override)
fn stored_default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Get the effective base URL
    ///
    /// Environment variable `RIPS_BASE_URL` takes precedence over the config file.
    pub fn base_url(&self) -> String {
        std::env::var(BASE_URL_ENV_VAR).unwrap_or_else(|_| self.stored_base_url.clone())
    }

    /// Base URL as written to the config file.
    pub fn stored_base_url(&self) -> &str {
        &self.stored_base_url
    }

    pub fn set_base_url(&mut self, base_url: String) {
        self.stored_base_url = base_url;
    }
}

impl Config {
    /// Create a configuration pointing at the public API server
    pub fn new() -> Self {
        Self::new_with_url(DEFAULT_BASE_URL.to_string())
    }

    /// Create a configuration with a custom base URL
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL for the API (stored in config file)
    pub fn new_with_url(base_url: String) -> Self {
        Self {
            stored_base_url: base_url,
            username: None,
            cookie_file: None,
            ca_certificate: None,
            public_suffix_list: None,
            timeout_secs: None,
        }
    }

    /// Client builder carrying every setting of this configuration.
    pub fn client_builder(&self) -> ApiClientBuilder {
        let mut builder = ApiClient::builder().base_url(self.base_url());
        if let Some(ref path) = self.cookie_file {
            builder = builder.cookie_file(path.clone());
        }
        if let Some(ref path) = self.ca_certificate {
            builder = builder.ca_certificate(path.clone());
        }
        if let Some(ref path) = self.public_suffix_list {
            builder = builder.public_suffix_list(path.clone());
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
    }

    /// Load configuration from the default config file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(_)` - Configuration file not found or invalid
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load the config file if there is one, defaults otherwise.
    pub fn load_or_default() -> Result<Self> {
        if Self::exists() {
            Self::load()
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default config file
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Check if a configuration file exists
    pub fn exists() -> bool {
        config_path().map(|p| p.exists()).unwrap_or(false)
    }
}

/// Get the path to the configuration file
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs_config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("rips").join("config.json"))
}

/// Get the config directory
///
/// Uses `$HOME/.config` on all platforms for consistency.
fn dirs_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .or_else(|| std::env::var("USERPROFILE").ok())
                .map(|h| PathBuf::from(h).join(".config"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_config_new_uses_public_server() {
        env::remove_var(BASE_URL_ENV_VAR);
        let config = Config::new();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert!(config.username.is_none());
    }

    #[test]
    #[serial]
    fn test_config_new_with_url() {
        env::remove_var(BASE_URL_ENV_VAR);
        let config = Config::new_with_url("http://localhost:8000".to_string());
        assert_eq!(config.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_config_serialization_skips_empty_fields() {
        let config = Config::new_with_url("https://api.example.com".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("https://api.example.com"));
        assert!(!json.contains("username"));
        assert!(!json.contains("cookie_file"));
    }

    #[test]
    #[serial]
    fn test_config_deserialization() {
        env::remove_var(BASE_URL_ENV_VAR);
        let json = r#"{"stored_base_url":"https://api.example.com","username":"alice","timeout_secs":60}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.base_url(), "https://api.example.com");
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert_eq!(config.timeout_secs, Some(60));
    }

    #[test]
    #[serial]
    fn test_config_deserialization_default_url() {
        env::remove_var(BASE_URL_ENV_VAR);
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    #[serial]
    fn test_env_var_takes_precedence() {
        let config = Config::new_with_url("http://stored.example.com".to_string());

        env::set_var(BASE_URL_ENV_VAR, "http://env.example.com");
        assert_eq!(config.base_url(), "http://env.example.com");
        assert_eq!(config.stored_base_url(), "http://stored.example.com");

        env::remove_var(BASE_URL_ENV_VAR);
        assert_eq!(config.base_url(), "http://stored.example.com");
    }

    #[test]
    #[serial]
    fn test_config_save_and_load_via_xdg_dir() {
        env::remove_var(BASE_URL_ENV_VAR);
        let temp_dir = TempDir::new().unwrap();
        let previous = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", temp_dir.path());

        let mut config = Config::new_with_url("http://test.example.com".to_string());
        config.username = Some("alice".to_string());
        config.save().unwrap();
        assert!(temp_dir.path().join("rips").join("config.json").exists());
        assert!(Config::exists());

        let loaded = Config::load().unwrap();
        assert_eq!(loaded.base_url(), "http://test.example.com");
        assert_eq!(loaded.username.as_deref(), Some("alice"));

        fs::remove_file(config_path().unwrap()).unwrap();
        assert!(!Config::exists());
        let fallback = Config::load_or_default().unwrap();
        assert_eq!(fallback.base_url(), DEFAULT_BASE_URL);

        match previous {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    #[test]
    #[serial]
    fn test_client_builder_applies_settings() {
        env::remove_var(BASE_URL_ENV_VAR);
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new_with_url("http://localhost:8080/".to_string());
        config.cookie_file = Some(temp_dir.path().join("cookies.json"));
        config.timeout_secs = Some(10);

        let client = config.client_builder().build().unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
        assert_eq!(
            client.cookie_jar().path(),
            Some(temp_dir.path().join("cookies.json").as_path())
        );
    }

    #[test]
    #[serial]
    fn test_client_builder_loads_public_suffix_list() {
        env::remove_var(BASE_URL_ENV_VAR);
        let temp_dir = TempDir::new().unwrap();
        let list = temp_dir.path().join("public_suffix_list.dat");
        let mut config = Config::new_with_url("http://localhost:8080".to_string());
        config.public_suffix_list = Some(list.clone());

        assert!(config.client_builder().build().is_err());

        fs::write(&list, "// ===BEGIN ICANN DOMAINS===\ncom\n").unwrap();
        assert!(config.client_builder().build().is_ok());
    }
}
