//! Configuration management
//!
//! This module handles loading and parsing configuration for the skilins client.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Resource cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Session (role claim) configuration
    #[serde(default)]
    pub session: SessionConfig,
    /// Upload configuration
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Remote REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every resource path is joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Resource cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a fetched resource stays fresh, in seconds
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Maximum number of cached resource keys
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

fn default_ttl() -> u64 {
    300
}

fn default_max_capacity() -> u64 {
    1_000
}

/// Session configuration
///
/// The role claim lives in the `userRole` cookie written by the external login
/// flow. It can be supplied inline or through a file holding the cookie header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Raw cookie header value, e.g. `userRole=admin; token=...`
    #[serde(default)]
    pub cookie: Option<String>,
    /// File containing the raw cookie header value
    #[serde(default)]
    pub cookie_file: Option<PathBuf>,
}

/// Upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum file size in bytes (default: 50MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed image MIME types for thumbnails and avatars
    #[serde(default = "default_allowed_image_types")]
    pub allowed_image_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            allowed_image_types: default_allowed_image_types(),
        }
    }
}

fn default_max_file_size() -> u64 {
    50 * 1024 * 1024 // 50MB
}

fn default_allowed_image_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/gif".to_string(),
        "image/webp".to_string(),
    ]
}

impl UploadConfig {
    /// Check if an image MIME type is allowed
    pub fn is_image_allowed(&self, mime_type: &str) -> bool {
        self.allowed_image_types.iter().any(|t| t == mime_type)
    }
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: format_yaml_error(&e),
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - SKILINS_API_URL
    /// - SKILINS_API_TIMEOUT_SECONDS
    /// - SKILINS_CACHE_TTL_SECONDS
    /// - SKILINS_CACHE_MAX_CAPACITY
    /// - SKILINS_SESSION_COOKIE
    /// - SKILINS_SESSION_COOKIE_FILE
    /// - SKILINS_UPLOAD_MAX_FILE_SIZE
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SKILINS_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("SKILINS_API_TIMEOUT_SECONDS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                self.api.timeout_seconds = timeout;
            }
        }

        if let Ok(ttl) = std::env::var("SKILINS_CACHE_TTL_SECONDS") {
            if let Ok(ttl) = ttl.parse::<u64>() {
                self.cache.ttl_seconds = ttl;
            }
        }
        if let Ok(capacity) = std::env::var("SKILINS_CACHE_MAX_CAPACITY") {
            if let Ok(capacity) = capacity.parse::<u64>() {
                self.cache.max_capacity = capacity;
            }
        }

        if let Ok(cookie) = std::env::var("SKILINS_SESSION_COOKIE") {
            self.session.cookie = Some(cookie);
        }
        if let Ok(path) = std::env::var("SKILINS_SESSION_COOKIE_FILE") {
            self.session.cookie_file = Some(PathBuf::from(path));
        }

        if let Ok(size) = std::env::var("SKILINS_UPLOAD_MAX_FILE_SIZE") {
            if let Ok(size) = size.parse::<u64>() {
                self.upload.max_file_size = size;
            }
        }
    }

    /// Reject configurations the client cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.cache.max_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "cache.max_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
const ENV_VARS: &[&str] = &[
    "SKILINS_API_URL",
    "SKILINS_API_TIMEOUT_SECONDS",
    "SKILINS_CACHE_TTL_SECONDS",
    "SKILINS_CACHE_MAX_CAPACITY",
    "SKILINS_SESSION_COOKIE",
    "SKILINS_SESSION_COOKIE_FILE",
    "SKILINS_UPLOAD_MAX_FILE_SIZE",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        let guard = super::CONFIG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        guard
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::path::Path::new("nonexistent_config.yml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:3000/api");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.cache.ttl_seconds, 300);
        assert_eq!(config.cache.max_capacity, 1_000);
        assert!(config.session.cookie.is_none());
        assert!(config.upload.is_image_allowed("image/png"));
        assert!(!config.upload.is_image_allowed("application/pdf"));
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "   \n").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000/api");
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "api:\n  base_url: \"https://skilins.example/api\"\n").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.api.base_url, "https://skilins.example/api");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.cache.ttl_seconds, 300);
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
api:
  base_url: "https://skilins.example/api"
  timeout_seconds: 5
cache:
  ttl_seconds: 60
  max_capacity: 50
session:
  cookie: "userRole=admin"
upload:
  max_file_size: 1024
  allowed_image_types: ["image/png"]
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.cache.max_capacity, 50);
        assert_eq!(config.session.cookie.as_deref(), Some("userRole=admin"));
        assert_eq!(config.upload.max_file_size, 1024);
        assert!(!config.upload.is_image_allowed("image/jpeg"));
    }

    #[test]
    fn test_load_invalid_yaml_reports_location() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "api:\n  timeout_seconds: soon\n").unwrap();

        let err = Config::load(file.path()).unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
        assert!(err.contains("line"));
    }

    #[test]
    fn test_env_overrides() {
        let _guard = lock_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "api:\n  base_url: \"http://file.example\"\n").unwrap();

        std::env::set_var("SKILINS_API_URL", "https://env.example/api");
        std::env::set_var("SKILINS_CACHE_TTL_SECONDS", "15");
        std::env::set_var("SKILINS_SESSION_COOKIE", "userRole=judge");
        std::env::set_var("SKILINS_UPLOAD_MAX_FILE_SIZE", "not-a-number");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.api.base_url, "https://env.example/api");
        assert_eq!(config.cache.ttl_seconds, 15);
        assert_eq!(config.session.cookie.as_deref(), Some("userRole=judge"));
        // Unparseable numbers are ignored
        assert_eq!(config.upload.max_file_size, 50 * 1024 * 1024);

        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let _guard = lock_env();

        std::env::set_var("SKILINS_API_URL", "ftp://nope");
        let result = Config::load_with_env(std::path::Path::new("nonexistent_config.yml"));
        std::env::remove_var("SKILINS_API_URL");

        let err = result.unwrap_err().to_string();
        assert!(err.contains("api.base_url"));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = Config::default();
        config.cache.max_capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }
}
