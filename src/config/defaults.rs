//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default Places API root
pub const DEFAULT_PLACES_BASE_URL: &str = constants::api::PLACES_BASE_URL;

/// Default timeout for Places requests in seconds
pub const DEFAULT_PLACES_TIMEOUT_SECS: u64 = 10;

/// Whether to try IP geolocation before falling back
pub const DEFAULT_DETECT_LOCATION: bool = true;

/// Default fallback latitude
pub const DEFAULT_FALLBACK_LAT: f64 = constants::geo::FALLBACK_LAT;

/// Default fallback longitude
pub const DEFAULT_FALLBACK_LNG: f64 = constants::geo::FALLBACK_LNG;

/// Default swipe delay in milliseconds
pub const DEFAULT_SWIPE_DELAY_MS: u64 = constants::feed::SWIPE_DELAY_MS;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "numnum";
