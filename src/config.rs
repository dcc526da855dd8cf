//! Configuration management for the Ramble 66 planner
//!
//! Handles loading configuration from files and environment variables
//! and provides validation for all configuration settings. The weather API
//! key is only ever taken from the environment.

use crate::RambleError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the OpenWeatherMap API key
pub const WEATHER_API_KEY_ENV: &str = "RAMBLE66_WEATHER_API_KEY";

/// Root configuration structure for the planner
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RambleConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Request de-duplication configuration
    #[serde(default)]
    pub dedup: DedupConfig,
    /// Trip planning thresholds
    #[serde(default)]
    pub trip: TripConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Client state storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key, read from `RAMBLE66_WEATHER_API_KEY` only
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Base URL for weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// HTTP timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// How many days ahead a live forecast is attempted
    #[serde(default = "default_live_forecast_days")]
    pub live_forecast_days: u32,
}

/// Request de-duplication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    /// How long an entry is shared with later callers, in seconds
    #[serde(default = "default_cache_window")]
    pub cache_window_seconds: u64,
    /// How long a settled entry is kept, in milliseconds
    #[serde(default = "default_grace_period")]
    pub grace_period_ms: u64,
    /// Timeout for a single coalesced request, in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

/// Trip planning thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripConfig {
    /// Daily mileage above which a trip is lengthened
    #[serde(default = "default_max_miles_per_day")]
    pub max_miles_per_day: f64,
    /// Daily mileage used to recompute the day count
    #[serde(default = "default_comfortable_miles_per_day")]
    pub comfortable_miles_per_day: f64,
    /// Average highway speed used for drive-time estimates
    #[serde(default = "default_average_speed")]
    pub average_speed_mph: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (off, error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Client state storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the file-backed key-value store
    #[serde(default = "default_storage_location")]
    pub location: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_live_forecast_days() -> u32 {
    5
}

fn default_cache_window() -> u64 {
    30
}

fn default_grace_period() -> u64 {
    1_000
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_max_miles_per_day() -> f64 {
    500.0
}

fn default_comfortable_miles_per_day() -> f64 {
    300.0
}

fn default_average_speed() -> f64 {
    55.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_storage_location() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("ramble66").join("state"))
        .unwrap_or_else(|| PathBuf::from(".ramble66/state"))
        .to_string_lossy()
        .into_owned()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8066
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            live_forecast_days: default_live_forecast_days(),
        }
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            cache_window_seconds: default_cache_window(),
            grace_period_ms: default_grace_period(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl DedupConfig {
    #[must_use]
    pub fn cache_window(&self) -> Duration {
        Duration::from_secs(self.cache_window_seconds)
    }

    #[must_use]
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            max_miles_per_day: default_max_miles_per_day(),
            comfortable_miles_per_day: default_comfortable_miles_per_day(),
            average_speed_mph: default_average_speed(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            location: default_storage_location(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl RambleConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // RAMBLE66_SERVER__PORT=9000 style overrides
        builder = builder.add_source(
            Environment::with_prefix("RAMBLE66")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: RambleConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.weather.api_key = std::env::var(WEATHER_API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ramble66").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.dedup.cache_window_seconds == 0 {
            self.dedup.cache_window_seconds = default_cache_window();
        }
        if self.dedup.request_timeout_ms == 0 {
            self.dedup.request_timeout_ms = default_request_timeout();
        }
        if self.trip.average_speed_mph <= 0.0 {
            self.trip.average_speed_mph = default_average_speed();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.storage.location.is_empty() {
            self.storage.location = default_storage_location();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the weather API key when one is present
    pub fn validate_api_key(&self) -> Result<()> {
        if let Some(api_key) = &self.weather.api_key {
            if api_key.len() < 16 || api_key.len() > 64 {
                return Err(RambleError::config(format!(
                    "{WEATHER_API_KEY_ENV} does not look like an OpenWeatherMap key"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 120 {
            return Err(RambleError::config("Weather API timeout cannot exceed 120 seconds").into());
        }

        if self.weather.live_forecast_days > 5 {
            return Err(RambleError::config(
                "Live forecast window cannot exceed the 5 day forecast horizon",
            )
            .into());
        }

        if self.dedup.grace_period() > self.dedup.cache_window() {
            return Err(
                RambleError::config("Dedup grace period cannot exceed the cache window").into(),
            );
        }

        if self.trip.comfortable_miles_per_day <= 0.0
            || self.trip.comfortable_miles_per_day > self.trip.max_miles_per_day
        {
            return Err(RambleError::config(
                "Comfortable miles per day must be positive and at most the maximum",
            )
            .into());
        }

        if self.trip.average_speed_mph > 85.0 {
            return Err(RambleError::config("Average speed cannot exceed 85 mph").into());
        }

        if self.server.port == 0 {
            return Err(RambleError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["off", "error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(RambleError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(RambleError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(RambleError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
