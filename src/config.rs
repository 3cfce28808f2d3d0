//! Configuration management for the propcast service
//!
//! Handles loading configuration from a TOML file and environment
//! variables, and provides validation for all configuration settings.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::PropcastError;

/// Root configuration structure for the propcast service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropcastConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Property listing source configuration
    #[serde(default)]
    pub properties: PropertiesConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the listing API binds to
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the forecast API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Maximum simultaneously in-flight provider requests per call
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Weather entry TTL in seconds
    #[serde(default = "default_cache_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Cache database directory
    #[serde(default = "default_cache_location")]
    pub location: String,
}

/// Property listing source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertiesConfig {
    /// Path to the JSON listing data file
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_port() -> u16 {
    5000
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_max_concurrent_fetches() -> usize {
    5
}

fn default_cache_ttl_seconds() -> u64 {
    300
}

fn default_cache_location() -> String {
    ".cache/propcast".to_string()
}

fn default_data_file() -> String {
    "data/properties.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl_seconds(),
            location: default_cache_location(),
        }
    }
}

impl Default for PropertiesConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for PropcastConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            weather: WeatherConfig::default(),
            cache: CacheConfig::default(),
            properties: PropertiesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PropcastConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config/default.toml"));

        let mut builder = Config::builder();
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. PROPCAST_WEATHER__BASE_URL
        builder = builder.add_source(
            Environment::with_prefix("PROPCAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: PropcastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Per-request timeout for provider calls
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.weather.request_timeout_ms)
    }

    /// TTL applied to every cache entry
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(PropcastError::config("Server port cannot be 0").into());
        }

        if self.weather.request_timeout_ms == 0 || self.weather.request_timeout_ms > 300_000 {
            return Err(PropcastError::config(
                "Weather request timeout must be between 1 and 300000 milliseconds",
            )
            .into());
        }

        if self.weather.max_concurrent_fetches == 0 || self.weather.max_concurrent_fetches > 64 {
            return Err(PropcastError::config(
                "Concurrent fetch limit must be between 1 and 64",
            )
            .into());
        }

        if self.cache.ttl_seconds > 7 * 24 * 60 * 60 {
            return Err(PropcastError::config(
                "Cache TTL cannot exceed 604800 seconds (1 week)",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PropcastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(PropcastError::config(
                "Weather base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
