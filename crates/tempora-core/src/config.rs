use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Forecast retrieval settings
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Geocoding and device-location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Offline cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Forecast retrieval settings.
///
/// The hourly window length and which optional hourly series are requested
/// are configuration, not code variants: 24 and 48 hour windows are both
/// supported, and each optional series can be switched off independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of hourly entries kept for display (24 or 48)
    #[serde(default = "default_hourly_window")]
    pub hourly_window_hours: u32,

    /// Request the hourly apparent-temperature series
    #[serde(default = "default_true")]
    pub include_hourly_feels_like: bool,

    /// Request the hourly precipitation series
    #[serde(default = "default_true")]
    pub include_hourly_precipitation: bool,

    /// Request the hourly wind-speed series
    #[serde(default = "default_true")]
    pub include_hourly_wind: bool,

    /// Forecast horizon in days
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,

    /// Refresh interval in minutes
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u32,
}

fn default_hourly_window() -> u32 {
    24
}

fn default_true() -> bool {
    true
}

fn default_forecast_days() -> u32 {
    15
}

fn default_refresh_minutes() -> u32 {
    15
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            hourly_window_hours: default_hourly_window(),
            include_hourly_feels_like: true,
            include_hourly_precipitation: true,
            include_hourly_wind: true,
            forecast_days: default_forecast_days(),
            refresh_minutes: default_refresh_minutes(),
        }
    }
}

/// Geocoding and device-location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Locale sent to the geocoding service
    #[serde(default = "default_language")]
    pub language: String,

    /// Minimum query length before type-ahead suggestions are requested
    #[serde(default = "default_suggest_min_chars")]
    pub suggest_min_chars: usize,

    /// Maximum number of type-ahead suggestions requested
    #[serde(default = "default_suggest_count")]
    pub suggest_count: u32,

    /// One-shot device position options
    #[serde(default)]
    pub device: DeviceConfig,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_suggest_min_chars() -> usize {
    3
}

fn default_suggest_count() -> u32 {
    5
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            suggest_min_chars: default_suggest_min_chars(),
            suggest_count: default_suggest_count(),
            device: DeviceConfig::default(),
        }
    }
}

/// One-shot device position options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Ask the position source for a high-accuracy fix
    #[serde(default = "default_true")]
    pub high_accuracy: bool,

    /// Position request timeout in seconds
    #[serde(default = "default_device_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum age of a cached fix that may be reused, in seconds
    #[serde(default = "default_maximum_age_secs")]
    pub maximum_age_secs: u64,
}

fn default_device_timeout_secs() -> u64 {
    10
}

fn default_maximum_age_secs() -> u64 {
    300
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_secs: default_device_timeout_secs(),
            maximum_age_secs: default_maximum_age_secs(),
        }
    }
}

/// Offline cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Version token; bumping it creates fresh cache generations and
    /// schedules the old ones for deletion on the next activation.
    #[serde(default = "default_cache_version")]
    pub version: String,

    /// Cache database filename, relative to the config directory
    #[serde(default = "default_cache_db_file")]
    pub db_file: String,

    /// Hosts whose requests are treated as API calls (network-first)
    #[serde(default = "default_api_hosts")]
    pub api_hosts: Vec<String>,

    /// App-shell asset URLs; installation fails if any of these fails
    #[serde(default)]
    pub shell_assets: Vec<String>,

    /// Large media asset URLs (background videos); fetched individually,
    /// tolerating per-file failure during installation
    #[serde(default)]
    pub media_assets: Vec<String>,
}

fn default_cache_version() -> String {
    "v1".to_string()
}

fn default_cache_db_file() -> String {
    "offline_cache.db".to_string()
}

fn default_api_hosts() -> Vec<String> {
    vec![
        "api.open-meteo.com".to_string(),
        "geocoding-api.open-meteo.com".to_string(),
    ]
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            version: default_cache_version(),
            db_file: default_cache_db_file(),
            api_hosts: default_api_hosts(),
            shell_assets: Vec::new(),
            media_assets: Vec::new(),
        }
    }
}

impl CacheConfig {
    /// Absolute path of the cache database.
    pub fn db_path(&self, config_dir: &std::path::Path) -> PathBuf {
        config_dir.join(&self.db_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tempora");

        Self {
            config_dir,
            forecast: ForecastConfig::default(),
            location: LocationConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("tempora");
        Ok(dir.join("config.toml"))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.forecast.hourly_window_hours == 0 || self.forecast.hourly_window_hours > 48 {
            result.add_error(
                "forecast.hourly_window_hours",
                "Hourly window must be between 1 and 48 hours",
            );
        } else if self.forecast.hourly_window_hours != 24 && self.forecast.hourly_window_hours != 48
        {
            result.add_warning(
                "forecast.hourly_window_hours",
                "Hourly window is usually 24 or 48 hours",
            );
        }

        if self.forecast.forecast_days == 0 || self.forecast.forecast_days > 16 {
            result.add_error(
                "forecast.forecast_days",
                "Forecast horizon must be between 1 and 16 days",
            );
        }

        if self.forecast.refresh_minutes == 0 {
            result.add_warning("forecast.refresh_minutes", "Forecast refresh disabled (0 minutes)");
        }

        if self.location.language.is_empty() {
            result.add_error("location.language", "Geocoding language must not be empty");
        }

        if self.location.suggest_count == 0 {
            result.add_warning("location.suggest_count", "Type-ahead suggestions disabled");
        }

        if self.location.device.timeout_secs == 0 {
            result.add_error(
                "location.device.timeout_secs",
                "Device position timeout must be greater than 0",
            );
        }

        if self.cache.version.is_empty() {
            result.add_error("cache.version", "Cache version token must not be empty");
        }

        if self.cache.api_hosts.is_empty() {
            result.add_warning(
                "cache.api_hosts",
                "No API hosts configured - all requests will be cached as static assets",
            );
        }

        for (i, asset) in self
            .cache
            .shell_assets
            .iter()
            .chain(self.cache.media_assets.iter())
            .enumerate()
        {
            if Url::parse(asset).is_err() {
                result.add_error(
                    format!("cache.assets[{}]", i),
                    format!("Not a valid URL: {}", asset),
                );
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "{}", result.error_summary());
    }

    #[test]
    fn hourly_window_out_of_range_is_an_error() {
        let mut config = Config::default();
        config.forecast.hourly_window_hours = 0;
        assert!(!config.validate().is_valid());

        config.forecast.hourly_window_hours = 72;
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn unusual_hourly_window_is_a_warning() {
        let mut config = Config::default();
        config.forecast.hourly_window_hours = 12;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn empty_version_token_is_an_error() {
        let mut config = Config::default();
        config.cache.version = String::new();
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn invalid_asset_url_is_an_error() {
        let mut config = Config::default();
        config.cache.shell_assets = vec!["not a url".to_string()];
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(
            parsed.forecast.hourly_window_hours,
            config.forecast.hourly_window_hours
        );
        assert_eq!(parsed.cache.api_hosts, config.cache.api_hosts);
    }
}
