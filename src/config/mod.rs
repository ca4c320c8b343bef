//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/numnum/config.toml

pub mod defaults;

use crate::constants::api::PLACES_API_KEY_ENV;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Places provider settings
    #[serde(default)]
    pub places: PlacesConfig,

    /// Location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Feed presentation settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Places provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// API key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Root URL of the place web service
    #[serde(default = "default_places_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_places_timeout")]
    pub timeout_secs: u64,
}

/// Location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Try IP geolocation when no manual location is given
    #[serde(default = "default_detect")]
    pub detect: bool,

    /// Keep IP lookups in the data directory for an hour
    #[serde(default)]
    pub cache_lookups: bool,

    /// Latitude used when detection is off or fails
    #[serde(default = "default_fallback_lat")]
    pub fallback_lat: f64,

    /// Longitude used when detection is off or fails
    #[serde(default = "default_fallback_lng")]
    pub fallback_lng: f64,
}

/// Feed presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Delay before the cursor advances after a like or save
    #[serde(default = "default_swipe_delay")]
    pub swipe_delay_ms: u64,
}

/// Persistence settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Override for the data directory (empty = XDG data dir)
    #[serde(default)]
    pub data_dir: String,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_places_base_url() -> String {
    DEFAULT_PLACES_BASE_URL.to_string()
}
fn default_places_timeout() -> u64 {
    DEFAULT_PLACES_TIMEOUT_SECS
}
fn default_detect() -> bool {
    DEFAULT_DETECT_LOCATION
}
fn default_fallback_lat() -> f64 {
    DEFAULT_FALLBACK_LAT
}
fn default_fallback_lng() -> f64 {
    DEFAULT_FALLBACK_LNG
}
fn default_swipe_delay() -> u64 {
    DEFAULT_SWIPE_DELAY_MS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_places_base_url(),
            timeout_secs: default_places_timeout(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            detect: default_detect(),
            cache_lookups: false,
            fallback_lat: default_fallback_lat(),
            fallback_lng: default_fallback_lng(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            swipe_delay_ms: default_swipe_delay(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist. The Places API key from
    /// the environment wins over the file.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })?
        } else {
            let config = Config::default();
            config.save()?;
            config
        };

        if let Ok(key) = std::env::var(PLACES_API_KEY_ENV) {
            if !key.is_empty() {
                config.places.api_key = key;
            }
        }

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["places", "api_key"] => Some(self.places.api_key.clone()),
            ["places", "base_url"] => Some(self.places.base_url.clone()),
            ["places", "timeout_secs"] => Some(self.places.timeout_secs.to_string()),

            ["location", "detect"] => Some(self.location.detect.to_string()),
            ["location", "cache_lookups"] => Some(self.location.cache_lookups.to_string()),
            ["location", "fallback_lat"] => Some(self.location.fallback_lat.to_string()),
            ["location", "fallback_lng"] => Some(self.location.fallback_lng.to_string()),

            ["feed", "swipe_delay_ms"] => Some(self.feed.swipe_delay_ms.to_string()),

            ["storage", "data_dir"] => Some(self.storage.data_dir.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["places", "api_key"] => {
                self.places.api_key = value.to_string();
            }
            ["places", "base_url"] => {
                self.places.base_url = value.trim_end_matches('/').to_string();
            }
            ["places", "timeout_secs"] => {
                self.places.timeout_secs = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
            }

            ["location", "detect"] => {
                self.location.detect = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid boolean value: {}", value))
                })?;
            }
            ["location", "cache_lookups"] => {
                self.location.cache_lookups = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid boolean value: {}", value))
                })?;
            }
            ["location", "fallback_lat"] => {
                self.location.fallback_lat = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid latitude value: {}", value))
                })?;
            }
            ["location", "fallback_lng"] => {
                self.location.fallback_lng = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid longitude value: {}", value))
                })?;
            }

            ["feed", "swipe_delay_ms"] => {
                self.feed.swipe_delay_ms = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid delay value: {}", value))
                })?;
            }

            ["storage", "data_dir"] => {
                self.storage.data_dir = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "server.host",
            "server.port",
            "places.api_key",
            "places.base_url",
            "places.timeout_secs",
            "location.detect",
            "location.cache_lookups",
            "location.fallback_lat",
            "location.fallback_lng",
            "feed.swipe_delay_ms",
            "storage.data_dir",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Coordinate used when no position can be resolved
    pub fn fallback_location(&self) -> Coordinates {
        Coordinates::new(self.location.fallback_lat, self.location.fallback_lng)
    }

    /// Delay between a like/save and the cursor advancing
    pub fn swipe_delay(&self) -> Duration {
        Duration::from_millis(self.feed.swipe_delay_ms)
    }

    /// Resolve the data directory for persisted records
    pub fn data_dir(&self) -> Result<PathBuf> {
        if !self.storage.data_dir.is_empty() {
            return Ok(PathBuf::from(&self.storage.data_dir));
        }
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    fn with_temp_config<F: FnOnce()>(f: F) {
        let temp_dir = TempDir::new().unwrap();
        env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        f();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.port, 7878);
        assert_eq!(config.places.base_url, "https://maps.googleapis.com/maps/api/place");
        assert!(config.places.api_key.is_empty());
        assert!(config.location.detect);
        assert_eq!(config.feed.swipe_delay_ms, 300);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("location.detect"), Some("true".to_string()));

        config.set("location.detect", "false").unwrap();
        assert_eq!(config.get("location.detect"), Some("false".to_string()));

        assert_eq!(config.get("location.cache_lookups"), Some("false".to_string()));
        config.set("location.cache_lookups", "true").unwrap();
        assert!(config.location.cache_lookups);

        config.set("location.fallback_lat", "43.65").unwrap();
        assert_eq!(config.location.fallback_lat, 43.65);

        config.set("places.base_url", "http://localhost:9000/").unwrap();
        assert_eq!(config.places.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("server.port", "not_a_port").is_err());
        assert!(config.set("location.detect", "maybe").is_err());
    }

    #[test]
    fn test_save_and_load() {
        with_temp_config(|| {
            let mut config = Config::default();
            config.server.port = 9090;
            config.location.detect = false;
            config.save().unwrap();

            let loaded = Config::load().unwrap();
            assert_eq!(loaded.server.port, 9090);
            assert!(!loaded.location.detect);
        });
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let loaded: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded.server.port, 7878);
        assert_eq!(loaded.feed.swipe_delay_ms, 300);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: Config = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(loaded.server.port, 8080);
        assert_eq!(loaded.server.host, "127.0.0.1");
        assert_eq!(loaded.location.fallback_lat, 44.2253);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[server]"));
        assert!(toml.contains("[places]"));
        assert!(toml.contains("[location]"));
        assert!(toml.contains("[feed]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7878");
    }

    #[test]
    fn test_fallback_and_delay() {
        let config = Config::default();
        assert_eq!(config.fallback_location(), Coordinates::new(44.2253, -76.4951));
        assert_eq!(config.swipe_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = Config::default();
        config.storage.data_dir = "/tmp/numnum-data".to_string();
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/numnum-data"));
    }

    #[test]
    fn test_available_keys() {
        let keys = Config::available_keys();
        assert!(keys.contains(&"places.api_key"));
        assert!(keys.contains(&"server.port"));
        assert!(keys.contains(&"feed.swipe_delay_ms"));
        for key in keys {
            assert!(Config::default().get(key).is_some(), "missing getter for {}", key);
        }
    }
}
