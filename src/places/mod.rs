//! Places gateway
//!
//! Boundary around the external place-search provider: one nearby search per
//! feed, plus on-demand detail and review lookups. No retries, caching or
//! pagination; the first page is all a feed ever sees.

pub mod client;
pub mod types;

pub use client::PlacesClient;
pub use types::{PlaceDetails, RawPlace, RawReview};

use crate::constants::places::{KEYWORD_SEPARATOR, PHOTO_MAX_WIDTH};
use crate::coord::Coordinates;
use crate::error::{Error, Result};

/// Message for a nearby search missing its center or radius
pub const MISSING_PARAMETERS: &str = "Missing required parameters";

/// Operations offered by a place-search provider
pub trait PlacesGateway: Send + Sync {
    /// Search for candidates around a center
    fn search_nearby(
        &self,
        query: &NearbyQuery,
    ) -> impl std::future::Future<Output = Result<Vec<RawPlace>>> + Send;

    /// Fetch price, types, rating, reviews, website and hours for one place
    fn fetch_details(
        &self,
        place_id: &str,
    ) -> impl std::future::Future<Output = Result<PlaceDetails>> + Send;

    /// Fetch only the reviews for one place
    fn fetch_reviews(
        &self,
        place_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<RawReview>>> + Send;

    /// Builder for photo URLs handed to clients
    fn photos(&self) -> &PhotoEndpoint;
}

/// Parameters of a nearby search
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub center: Coordinates,
    pub radius_km: f64,
    pub keywords: Vec<String>,
    pub max_price: Option<u8>,
}

impl NearbyQuery {
    pub fn new(center: Coordinates, radius_km: f64) -> Self {
        Self {
            center,
            radius_km,
            keywords: Vec::new(),
            max_price: None,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_price(mut self, max_price: Option<u8>) -> Self {
        self.max_price = max_price;
        self
    }

    /// Build a query from loosely supplied inputs
    ///
    /// Center and radius are required; their absence is a bad request.
    pub fn from_parts(
        lat: Option<f64>,
        lng: Option<f64>,
        radius_km: Option<f64>,
        keywords: Vec<String>,
        max_price: Option<u8>,
    ) -> Result<Self> {
        let (Some(lat), Some(lng), Some(radius_km)) = (lat, lng, radius_km) else {
            return Err(Error::BadRequest(MISSING_PARAMETERS.to_string()));
        };

        let query = Self::new(Coordinates::new(lat, lng), radius_km)
            .with_keywords(keywords)
            .with_max_price(max_price);
        query.validate()?;
        Ok(query)
    }

    /// Reject queries the provider could never answer
    pub fn validate(&self) -> Result<()> {
        self.center
            .validate()
            .map_err(|e| Error::BadRequest(e.to_string()))?;

        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(Error::BadRequest(format!(
                "Radius must be positive, got {}",
                self.radius_km
            )));
        }

        if let Some(price) = self.max_price {
            if !(1..=4).contains(&price) {
                return Err(Error::BadRequest(format!(
                    "Max price must be between 1 and 4, got {}",
                    price
                )));
            }
        }

        Ok(())
    }

    /// Radius in whole meters, rounded to nearest
    pub fn radius_meters(&self) -> u64 {
        (self.radius_km * 1000.0).round() as u64
    }

    /// Keywords OR-joined for the provider, or None when there are none
    pub fn keyword_filter(&self) -> Option<String> {
        let keywords: Vec<&str> = self
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();

        if keywords.is_empty() {
            None
        } else {
            Some(keywords.join(KEYWORD_SEPARATOR))
        }
    }
}

/// Builds photo-fetch URLs for photo references
#[derive(Debug, Clone)]
pub struct PhotoEndpoint {
    base_url: String,
    api_key: String,
}

impl PhotoEndpoint {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// URL for a photo reference at the fixed maximum width
    pub fn url_for(&self, photo_reference: &str) -> String {
        let mut url = format!(
            "{}/photo?maxwidth={}&photo_reference={}",
            self.base_url,
            PHOTO_MAX_WIDTH,
            urlencoding::encode(photo_reference)
        );
        if !self.api_key.is_empty() {
            url.push_str(&format!("&key={}", urlencoding::encode(&self.api_key)));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_missing_inputs() {
        for (lat, lng, radius) in [
            (None, Some(-79.4), Some(10.0)),
            (Some(43.7), None, Some(10.0)),
            (Some(43.7), Some(-79.4), None),
        ] {
            let err = NearbyQuery::from_parts(lat, lng, radius, vec![], None).unwrap_err();
            assert!(matches!(err, Error::BadRequest(ref m) if m == MISSING_PARAMETERS));
        }
    }

    #[test]
    fn test_from_parts_valid() {
        let query = NearbyQuery::from_parts(
            Some(43.7),
            Some(-79.4),
            Some(2.5),
            vec!["italian".to_string()],
            Some(3),
        )
        .unwrap();

        assert_eq!(query.center, Coordinates::new(43.7, -79.4));
        assert_eq!(query.radius_meters(), 2500);
        assert_eq!(query.max_price, Some(3));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let center = Coordinates::new(43.7, -79.4);
        assert!(NearbyQuery::new(center, 0.0).validate().is_err());
        assert!(NearbyQuery::new(center, -1.0).validate().is_err());
        assert!(NearbyQuery::new(center, f64::NAN).validate().is_err());
        assert!(NearbyQuery::new(center, 1.0).with_max_price(Some(5)).validate().is_err());
        assert!(NearbyQuery::new(Coordinates::new(95.0, 0.0), 1.0).validate().is_err());
    }

    #[test]
    fn test_radius_rounds_to_nearest_meter() {
        let center = Coordinates::new(0.0, 0.0);
        assert_eq!(NearbyQuery::new(center, 1.2344).radius_meters(), 1234);
        assert_eq!(NearbyQuery::new(center, 1.2346).radius_meters(), 1235);
        assert_eq!(NearbyQuery::new(center, 10.0).radius_meters(), 10_000);
    }

    #[test]
    fn test_keyword_filter() {
        let center = Coordinates::new(0.0, 0.0);
        assert_eq!(NearbyQuery::new(center, 1.0).keyword_filter(), None);
        assert_eq!(
            NearbyQuery::new(center, 1.0)
                .with_keywords(["italian", "sushi"])
                .keyword_filter(),
            Some("italian|sushi".to_string())
        );
        assert_eq!(
            NearbyQuery::new(center, 1.0).with_keywords([" ", ""]).keyword_filter(),
            None
        );
    }

    #[test]
    fn test_photo_url() {
        let photos = PhotoEndpoint::new("https://maps.googleapis.com/maps/api/place/", "k");
        assert_eq!(
            photos.url_for("ref123"),
            "https://maps.googleapis.com/maps/api/place/photo?maxwidth=400&photo_reference=ref123&key=k"
        );

        let keyless = PhotoEndpoint::new("http://localhost", "");
        assert_eq!(
            keyless.url_for("a b"),
            "http://localhost/photo?maxwidth=400&photo_reference=a%20b"
        );
    }
}
