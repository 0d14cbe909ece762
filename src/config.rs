//! Configuration management for the explorer service
//!
//! Handles loading configuration from an optional TOML file and environment
//! variables, and validates every setting before the server starts.

use crate::ExplorerError;
use crate::models::Coordinate;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// The fixed region the service is centered on
    pub region: RegionConfig,
    /// Map-data (Overpass) provider
    pub overpass: OverpassConfig,
    /// Weather (OpenWeatherMap) provider
    pub weather: WeatherConfig,
    /// Routing (OSRM) provider
    pub routing: RoutingConfig,
    /// Cache tier sizing
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Debug mode lowers the default log level to `debug`
    pub debug: bool,
    /// Directory served under `/static`
    pub static_dir: String,
    /// Directory holding `index.html`
    pub templates_dir: String,
}

/// Region settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Area name used to scope map-data queries
    pub name: String,
    /// Latitude used when a request carries none
    pub default_latitude: f64,
    /// Longitude used when a request carries none
    pub default_longitude: f64,
}

/// Overpass API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverpassConfig {
    /// Interpreter endpoint
    pub url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Retries for transient failures
    pub max_retries: u32,
}

/// Weather API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key; without it weather is unavailable
    pub api_key: Option<String>,
    /// Current-conditions endpoint
    pub url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Language code for localized descriptions
    pub language: String,
}

/// Routing API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// OSRM base URL (without `/route/v1/...`)
    pub url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Cache tier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub poi_ttl_seconds: u64,
    pub poi_capacity: usize,
    pub weather_ttl_seconds: u64,
    pub weather_capacity: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log file path; empty disables file logging
    pub file_path: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_region_name() -> String {
    "Puno".to_string()
}

/// Center of Puno
const DEFAULT_LATITUDE: f64 = -15.8403;
const DEFAULT_LONGITUDE: f64 = -70.0217;

fn default_overpass_url() -> String {
    "http://overpass-api.de/api/interpreter".to_string()
}

fn default_overpass_timeout() -> u32 {
    30
}

fn default_overpass_max_retries() -> u32 {
    0
}

fn default_weather_url() -> String {
    "http://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_weather_language() -> String {
    "es".to_string()
}

fn default_routing_url() -> String {
    "http://router.project-osrm.org".to_string()
}

fn default_routing_timeout() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file_path() -> String {
    "app.log".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            static_dir: default_static_dir(),
            templates_dir: default_templates_dir(),
        }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            name: default_region_name(),
            default_latitude: DEFAULT_LATITUDE,
            default_longitude: DEFAULT_LONGITUDE,
        }
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: default_overpass_url(),
            timeout_seconds: default_overpass_timeout(),
            max_retries: default_overpass_max_retries(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            url: default_weather_url(),
            timeout_seconds: default_weather_timeout(),
            language: default_weather_language(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            url: default_routing_url(),
            timeout_seconds: default_routing_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            poi_ttl_seconds: 24 * 60 * 60,
            poi_capacity: 100,
            weather_ttl_seconds: 5 * 60,
            weather_capacity: 100,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: default_log_file_path(),
        }
    }
}

impl OverpassConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl RoutingConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl RegionConfig {
    /// Coordinate used when a request does not supply one
    #[must_use]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.default_latitude, self.default_longitude)
    }
}

impl ExplorerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(env::var("EXPLORER_CONFIG").ok().map(PathBuf::from))
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("explorer.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // EXPLORER_SERVER__PORT, EXPLORER_WEATHER__API_KEY, ...
        builder = builder.add_source(
            Environment::with_prefix("EXPLORER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Well-known variables win over everything else
        builder = builder
            .set_override_option("weather.api_key", env::var("OPENWEATHERMAP_API_KEY").ok())?
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("server.debug", env::var("DEBUG").ok())?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ExplorerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self
            .weather
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            self.weather.api_key = None;
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.region.name.is_empty() {
            self.region.name = default_region_name();
        }
        if self.overpass.url.is_empty() {
            self.overpass.url = default_overpass_url();
        }
        if self.weather.url.is_empty() {
            self.weather.url = default_weather_url();
        }
        if self.weather.language.is_empty() {
            self.weather.language = default_weather_language();
        }
        if self.routing.url.is_empty() {
            self.routing.url = default_routing_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.region
            .center()
            .validate()
            .map_err(|e| ExplorerError::config(format!("Invalid region center: {e}")))?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ExplorerError::config("Server port cannot be 0").into());
        }

        for (name, timeout) in [
            ("Overpass", self.overpass.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
            ("Routing", self.routing.timeout_seconds),
        ] {
            if timeout == 0 || timeout > 300 {
                return Err(ExplorerError::config(format!(
                    "{name} API timeout must be between 1 and 300 seconds"
                ))
                .into());
            }
        }

        if self.overpass.max_retries > 10 {
            return Err(ExplorerError::config("Overpass API max retries cannot exceed 10").into());
        }

        if self.cache.poi_capacity == 0 || self.cache.weather_capacity == 0 {
            return Err(ExplorerError::config("Cache capacity must be at least 1").into());
        }

        if self.cache.poi_ttl_seconds == 0 || self.cache.weather_ttl_seconds == 0 {
            return Err(ExplorerError::config("Cache TTL must be at least 1 second").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ExplorerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Overpass", &self.overpass.url),
            ("Weather", &self.weather.url),
            ("Routing", &self.routing.url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ExplorerError::config(format!(
                    "{name} API URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
