use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the Plant.id API key.
pub const PLANT_ID_API_KEY_ENV: &str = "PLANT_ID_API_KEY";
/// Environment variable holding the OpenWeatherMap API key.
pub const WEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
/// Environment variable overriding the relay port.
pub const PORT_ENV: &str = "PORT";

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

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

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

    /// Plant identification settings
    #[serde(default)]
    pub identify: IdentifyConfig,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Local reminder storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Identification relay server
    #[serde(default)]
    pub relay: RelayConfig,
}

/// Which path the tracker uses to reach the identification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdentifyMode {
    /// Call Plant.id directly with a locally held key.
    #[default]
    Direct,
    /// Go through the relay, which holds the key server-side.
    Relay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyConfig {
    /// Base URL of the Plant.id API
    #[serde(default = "default_identify_api_url")]
    pub api_url: String,

    /// Base URL of the identification relay
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    #[serde(default)]
    pub mode: IdentifyMode,

    /// Only ever read from the environment; never written to disk.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_identify_api_url() -> String {
    "https://api.plant.id".to_string()
}

fn default_relay_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        Self {
            api_url: default_identify_api_url(),
            relay_url: default_relay_url(),
            mode: IdentifyMode::default(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the OpenWeatherMap API
    #[serde(default = "default_weather_api_url")]
    pub api_url: String,

    /// City queried at startup
    #[serde(default = "default_location")]
    pub location: String,

    /// Only ever read from the environment; never written to disk.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_weather_api_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_location() -> String {
    "Berlin".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: default_weather_api_url(),
            location: default_location(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the key-value store file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plantcare")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plantcare");

        Self {
            config_dir,
            identify: IdentifyConfig::default(),
            weather: WeatherConfig::default(),
            storage: StorageConfig::default(),
            relay: RelayConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing,
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from an explicit file, writing defaults there when
    /// the file does not exist. Environment overrides are not applied.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it.
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Defaults plus environment overrides, without touching any file.
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        config.apply_env_from(lookup);
        config
    }

    /// Pull secrets and the relay port from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(PLANT_ID_API_KEY_ENV) {
            self.identify.api_key = Some(key);
        }
        if let Some(key) = get(WEATHER_API_KEY_ENV) {
            self.weather.api_key = Some(key);
        }
        if let Some(port) = get(PORT_ENV) {
            match port.parse::<u16>() {
                Ok(p) => self.relay.port = p,
                Err(e) => tracing::warn!("Ignoring invalid {}={}: {}", PORT_ENV, port, e),
            }
        }
    }

    /// The Plant.id key, or an error naming the variable to set.
    pub fn require_identify_key(&self) -> Result<&str, ConfigError> {
        self.identify
            .api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingSetting(PLANT_ID_API_KEY_ENV.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.identify.api_url, "identify.api_url", &mut result);
        self.validate_url(&self.identify.relay_url, "identify.relay_url", &mut result);
        self.validate_url(&self.weather.api_url, "weather.api_url", &mut result);

        if self.weather.location.trim().is_empty() {
            result.add_error("weather.location", "Location must not be empty");
        }

        if self.identify.mode == IdentifyMode::Direct && self.identify.api_key.is_none() {
            result.add_warning(
                "identify.api_key",
                format!(
                    "{} not set - identification will fail and fallback plants will be used",
                    PLANT_ID_API_KEY_ENV
                ),
            );
        }

        if self.weather.api_key.is_none() {
            result.add_warning(
                "weather.api_key",
                format!(
                    "{} not set - fallback weather will be shown",
                    WEATHER_API_KEY_ENV
                ),
            );
        }

        if self.relay.port == 0 {
            result.add_error("relay.port", "Port cannot be 0");
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("plantcare");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_missing_keys_are_warnings() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "identify.api_key"));
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
    }

    #[test]
    fn test_relay_mode_does_not_need_local_key() {
        let mut config = Config::default();
        config.identify.mode = IdentifyMode::Relay;
        let result = config.validate();
        assert!(!result.warnings.iter().any(|w| w.field == "identify.api_key"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.api_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_empty_location_is_error() {
        let mut config = Config::default();
        config.weather.location = "  ".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "weather.location"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_from(env(&[
            ("PLANT_ID_API_KEY", "plant-key"),
            ("OPENWEATHER_API_KEY", "weather-key"),
            ("PORT", "8081"),
        ]));
        assert_eq!(config.identify.api_key.as_deref(), Some("plant-key"));
        assert_eq!(config.weather.api_key.as_deref(), Some("weather-key"));
        assert_eq!(config.relay.port, 8081);
        assert_eq!(config.require_identify_key().unwrap(), "plant-key");
    }

    #[test]
    fn test_invalid_port_env_is_ignored() {
        let mut config = Config::default();
        config.apply_env_from(env(&[("PORT", "not-a-port"), ("PLANT_ID_API_KEY", " ")]));
        assert_eq!(config.relay.port, 3000);
        assert!(matches!(
            config.require_identify_key(),
            Err(ConfigError::MissingSetting(_))
        ));
    }

    #[test]
    fn test_env_only_config() {
        let config =
            Config::from_env_with(env(&[("PLANT_ID_API_KEY", "relay-key"), ("PORT", "4000")]));
        assert_eq!(config.require_identify_key().unwrap(), "relay-key");
        assert_eq!(config.relay.port, 4000);
        assert_eq!(config.relay.bind, "127.0.0.1");
        assert_eq!(config.identify.api_url, "https://api.plant.id");
    }

    #[test]
    fn test_secrets_are_never_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::load_from(&path).unwrap();
        config.identify.api_key = Some("secret".to_string());
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("secret"));

        let reloaded = Config::load_from(&path).unwrap();
        assert!(reloaded.identify.api_key.is_none());
        assert_eq!(reloaded.weather.location, "Berlin");
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
