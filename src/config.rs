use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Remote fare store connection
    pub store: StoreConfig,
    /// Allowed CORS origins. Required unless cors_permissive is true.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Explicitly allow all origins (development only). Defaults to false.
    #[serde(default)]
    pub cors_permissive: bool,
    /// IANA timezone the peak windows are defined in (default: Africa/Nairobi)
    #[serde(default = "Config::default_timezone")]
    pub timezone: String,
    /// Number of seats the sensor unit reports (default: 2)
    #[serde(default = "Config::default_seat_count")]
    pub seat_count: u32,
}

/// Connection settings for the hosted fare store
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store, e.g. https://project.supabase.co
    pub url: String,
    /// API key; the FARETECH_STORE_KEY environment variable takes precedence
    #[serde(default)]
    pub api_key: Option<String>,
}

impl StoreConfig {
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        if let Ok(key) = std::env::var("FARETECH_STORE_KEY") {
            if !key.is_empty() {
                return Ok(key);
            }
        }
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingStoreKey)
    }
}

impl Config {
    fn default_timezone() -> String {
        "Africa/Nairobi".to_string()
    }

    fn default_seat_count() -> u32 {
        2
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn reference_timezone(&self) -> Result<chrono_tz::Tz, ConfigError> {
        self.timezone
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),
    #[error("No store API key configured (set store.api_key or FARETECH_STORE_KEY)")]
    MissingStoreKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: Config = serde_yaml::from_str(
            "store:\n  url: https://example.supabase.co\n  api_key: secret\n",
        )
        .unwrap();
        assert_eq!(config.timezone, "Africa/Nairobi");
        assert_eq!(config.seat_count, 2);
        assert!(!config.cors_permissive);
        assert!(config.cors_origins.is_empty());
        assert_eq!(
            config.reference_timezone().unwrap(),
            chrono_tz::Africa::Nairobi
        );
    }

    #[test]
    fn invalid_timezone_is_an_error() {
        let config: Config = serde_yaml::from_str(
            "store:\n  url: https://example.supabase.co\ntimezone: Mars/Olympus\n",
        )
        .unwrap();
        assert!(matches!(
            config.reference_timezone(),
            Err(ConfigError::InvalidTimezone(_))
        ));
    }
}
