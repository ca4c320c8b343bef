//! Feed assembly
//!
//! One fetch cycle: search around the resolved location, normalize every
//! result, compute distances and keep what lies within the preferred
//! radius. Provider order is preserved.

pub mod session;

pub use session::{FeedSession, Generation};

use crate::constants::feed::GENERIC_FAILURE;
use crate::coord::distance::distance_km;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::places::{NearbyQuery, PlacesGateway};
use crate::preferences::UserPreferences;
use crate::restaurant::{normalize, Restaurant};
use serde::Serialize;
use tracing::{debug, error, info};

/// What the user sees for a feed: exactly one of these at a time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum FeedState {
    Loading,
    Failed(String),
    Empty,
    Ready(Vec<Restaurant>),
}

impl FeedState {
    /// Classify the outcome of an assembly
    pub fn from_result(result: Result<Vec<Restaurant>>) -> Self {
        match result {
            Ok(restaurants) if restaurants.is_empty() => FeedState::Empty,
            Ok(restaurants) => FeedState::Ready(restaurants),
            Err(e) => FeedState::Failed(e.to_string()),
        }
    }

    /// Restaurants of a ready feed, empty otherwise
    pub fn restaurants(&self) -> &[Restaurant] {
        match self {
            FeedState::Ready(restaurants) => restaurants,
            _ => &[],
        }
    }
}

/// Builds feeds from a places gateway
#[derive(Debug)]
pub struct FeedAssembler<G> {
    gateway: G,
}

impl<G: PlacesGateway> FeedAssembler<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Assemble a feed for the given preferences and location
    ///
    /// A failed location is returned as-is without contacting the provider.
    /// Provider and input errors keep their message; anything else becomes
    /// the generic failure.
    pub async fn assemble(
        &self,
        prefs: &UserPreferences,
        location: Result<Coordinates>,
    ) -> Result<Vec<Restaurant>> {
        let location = location?;

        self.assemble_at(prefs, location).await.map_err(|e| match e {
            Error::BadRequest(_) | Error::Gateway { .. } | Error::LocationUnavailable(_) => e,
            other => {
                error!("Feed assembly failed: {}", other);
                Error::Feed(GENERIC_FAILURE.to_string())
            }
        })
    }

    async fn assemble_at(
        &self,
        prefs: &UserPreferences,
        location: Coordinates,
    ) -> Result<Vec<Restaurant>> {
        let query = NearbyQuery::new(location, prefs.max_distance)
            .with_keywords(prefs.cuisine_keywords())
            .with_max_price(Some(prefs.price_range));

        let places = self.gateway.search_nearby(&query).await?;
        let candidates = places.len();

        let restaurants: Vec<Restaurant> = places
            .iter()
            .filter(|place| {
                if place.place_id.is_empty() {
                    debug!("Dropping place without id: {}", place.name);
                    false
                } else {
                    true
                }
            })
            .map(|place| {
                let mut restaurant = normalize(place, self.gateway.photos());
                restaurant.distance = distance_km(location, restaurant.location);
                restaurant
            })
            .filter(|r| r.distance <= prefs.max_distance)
            .collect();

        info!(
            "Feed assembled: {} of {} candidates within {} km of {}",
            restaurants.len(),
            candidates,
            prefs.max_distance,
            location
        );

        Ok(restaurants)
    }
}
