//! Centralized constants for the numnum crate
//!
//! Values shared across modules live here so the gateway, normalizer and
//! stores agree on them.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Latitude used when no position can be obtained (Queen's University, Kingston)
    pub const FALLBACK_LAT: f64 = 44.2253;

    /// Longitude used when no position can be obtained
    pub const FALLBACK_LNG: f64 = -76.4951;
}

/// External API endpoints
pub mod api {
    /// Google Places web service root
    pub const PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// Environment variable holding the Places API key
    pub const PLACES_API_KEY_ENV: &str = "GOOGLE_PLACES_API_KEY";
}

/// Places provider request shaping
pub mod places {
    /// Place type sent with every nearby search
    pub const SEARCH_PLACE_TYPE: &str = "restaurant";

    /// Separator for OR-joined keywords
    pub const KEYWORD_SEPARATOR: &str = "|";

    /// Field mask for the full detail lookup
    pub const DETAIL_FIELDS: &str =
        "price_level,types,rating,user_ratings_total,reviews,website,opening_hours";

    /// Field mask for the reviews-only lookup
    pub const REVIEW_FIELDS: &str = "reviews";

    /// Maximum width requested for photo URLs
    pub const PHOTO_MAX_WIDTH: u32 = 400;

    /// Image used when a place has no photo
    pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

    /// Source label attached to provider reviews
    pub const REVIEW_SOURCE: &str = "Google";
}

/// Persisted record keys
pub mod storage {
    /// Key for the serialized user preferences
    pub const PREFERENCES_KEY: &str = "userPreferences";

    /// Key for the serialized liked restaurants
    pub const LIKED_KEY: &str = "likedRestaurants";
}

/// Feed presentation
pub mod feed {
    /// Delay between a like/save and the cursor advancing, in milliseconds
    pub const SWIPE_DELAY_MS: u64 = 300;

    /// Message shown when feed assembly fails unexpectedly
    pub const GENERIC_FAILURE: &str = "An error occurred while fetching restaurants";
}

/// Cache settings
pub mod cache {
    /// IP location cache duration in seconds (1 hour)
    pub const IP_LOCATION_TTL_SECS: u64 = 3600;

    /// Storage key for the cached IP location
    pub const IP_LOCATION_KEY: &str = "ipLocation";
}
