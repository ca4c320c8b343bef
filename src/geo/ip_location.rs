//! IP-based geolocation
//!
//! The server has no device position, so the public IP's approximate
//! location stands in for it. Lookups go to ip-api.com and the answer is
//! kept in the key-value store for an hour when a cache is attached.

use crate::constants::api::IP_API_URL;
use crate::constants::cache::{IP_LOCATION_KEY, IP_LOCATION_TTL_SECS};
use crate::error::{Error, Result};
use crate::geo::{GeoLocation, PositionProvider};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

const LOOKUP_TIMEOUT_SECS: u64 = 5;

/// Position capability backed by IP geolocation
#[derive(Debug)]
pub struct IpLocator {
    client: reqwest::Client,
    endpoint: String,
    cache: Option<Arc<dyn KeyValueStore>>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    region_name: Option<String>,
    country: Option<String>,
}

impl LookupResponse {
    fn into_location(self) -> Result<GeoLocation> {
        if self.status != "success" {
            return Err(Error::LocationUnavailable(format!(
                "IP lookup failed: {}",
                self.message.as_deref().unwrap_or("unknown reason")
            )));
        }

        let (Some(lat), Some(lng)) = (self.lat, self.lon) else {
            return Err(Error::LocationUnavailable(
                "IP lookup returned no coordinates".to_string(),
            ));
        };

        let display_name = [self.city, self.region_name, self.country]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(GeoLocation {
            lat,
            lng,
            display_name: if display_name.is_empty() {
                "Unknown Location".to_string()
            } else {
                display_name
            },
        })
    }
}

/// A lookup result with the time it was made
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedLocation {
    location: GeoLocation,
    located_at: DateTime<Utc>,
}

impl CachedLocation {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.located_at < Duration::seconds(IP_LOCATION_TTL_SECS as i64)
    }
}

impl IpLocator {
    /// Create a locator without a cache
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(LOOKUP_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: IP_API_URL.to_string(),
            cache: None,
        }
    }

    /// Keep lookups in `store` for an hour
    pub fn with_cache(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.cache = Some(store);
        self
    }

    /// Whether lookups are kept in a store
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Point the locator at a different lookup endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Current location, from cache when fresh
    pub async fn locate(&self) -> Result<GeoLocation> {
        if let Some(location) = self.cached(Utc::now()) {
            debug!("Using cached IP location {}", location.display_name);
            return Ok(location);
        }

        let location = self.lookup().await?;
        self.remember(&location);
        Ok(location)
    }

    async fn lookup(&self) -> Result<GeoLocation> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| Error::LocationUnavailable(format!("IP lookup request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::LocationUnavailable(format!(
                "IP lookup returned status {}",
                response.status()
            )));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| Error::LocationUnavailable(format!("IP lookup response unreadable: {}", e)))?;

        body.into_location()
    }

    fn cached(&self, now: DateTime<Utc>) -> Option<GeoLocation> {
        let content = self.cache.as_ref()?.get(IP_LOCATION_KEY).ok()??;
        let cached: CachedLocation = serde_json::from_str(&content).ok()?;
        cached.is_fresh(now).then_some(cached.location)
    }

    fn remember(&self, location: &GeoLocation) {
        let Some(cache) = &self.cache else {
            return;
        };

        let cached = CachedLocation {
            location: location.clone(),
            located_at: Utc::now(),
        };

        let result = serde_json::to_string(&cached)
            .map_err(Error::from)
            .and_then(|content| cache.set(IP_LOCATION_KEY, &content));

        if let Err(e) = result {
            warn!("Failed to cache IP location: {}", e);
        }
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionProvider for IpLocator {
    async fn current_position(&self) -> Result<GeoLocation> {
        self.locate().await
    }
}
