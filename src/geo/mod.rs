//! Geolocation resolution
//!
//! Turns "where is the user?" into a coordinate. A manual coordinate wins,
//! then the platform position capability, then a fixed fallback. Resolution
//! never fails: a missing or broken capability quietly yields the fallback.

pub mod ip_location;

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::storage::FileStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// A located position with a human-readable label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Display name (city, region, country)
    pub display_name: String,
}

impl GeoLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Platform capability that reports the current position
pub trait PositionProvider: Send + Sync {
    /// Ask for the current position once
    fn current_position(&self) -> impl std::future::Future<Output = Result<GeoLocation>> + Send;
}

/// Resolves the user's coordinate with a single attempt and a fixed fallback
#[derive(Debug)]
pub struct LocationResolver<P> {
    provider: Option<P>,
    fallback: Coordinates,
}

impl<P: PositionProvider> LocationResolver<P> {
    /// Create a resolver; `None` means the capability is absent
    pub fn new(provider: Option<P>, fallback: Coordinates) -> Self {
        Self { provider, fallback }
    }

    /// Coordinate returned whenever the capability cannot answer
    pub fn fallback(&self) -> Coordinates {
        self.fallback
    }

    /// Resolve the coordinate to search around
    ///
    /// A manual coordinate is returned as-is without touching the capability.
    /// Otherwise the capability is asked once; any failure yields the fallback.
    pub async fn resolve(&self, manual: Option<Coordinates>) -> Coordinates {
        if let Some(coords) = manual {
            debug!("Using manual location {}", coords);
            return coords;
        }

        let Some(provider) = &self.provider else {
            debug!("No position capability, using fallback {}", self.fallback);
            return self.fallback;
        };

        match provider.current_position().await {
            Ok(location) => {
                let coords = location.coordinates();
                if coords.validate().is_ok() {
                    debug!("Located at {} ({})", coords, location.display_name);
                    coords
                } else {
                    warn!("Position capability returned out-of-range {}, using fallback", coords);
                    self.fallback
                }
            }
            Err(e) => {
                warn!("Position lookup failed ({}), using fallback {}", e, self.fallback);
                self.fallback
            }
        }
    }
}

impl LocationResolver<ip_location::IpLocator> {
    /// Build the resolver described by the location config section
    ///
    /// IP lookups are written to the data directory only when
    /// `location.cache_lookups` is set.
    pub fn from_config(config: &Config) -> Self {
        let provider = config.location.detect.then(|| {
            let locator = ip_location::IpLocator::new();
            if !config.location.cache_lookups {
                return locator;
            }
            match config.data_dir() {
                Ok(dir) => locator.with_cache(Arc::new(FileStore::new(dir))),
                Err(_) => locator,
            }
        });
        Self::new(provider, config.fallback_location())
    }
}
