//! Raw provider records
//!
//! Shapes returned by the place web service. Everything the provider may leave
//! out is optional here; defaults are decided by the normalizer, not by serde.

use serde::{Deserialize, Serialize};

/// Envelope of a nearby search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<RawPlace>,
    /// Ignored: only the first page is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// One place as returned by nearby search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPlace {
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub photos: Vec<RawPhoto>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
    pub geometry: Geometry,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPhoto {
    pub photo_reference: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Envelope of a detail lookup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<PlaceDetails>,
}

/// Extended detail for one place, limited to the requested field mask
///
/// Serialized in camelCase for API clients; nested provider records keep
/// their provider naming.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct PlaceDetails {
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Option<Vec<String>>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub reviews: Option<Vec<RawReview>>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
}

/// A provider review
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
    /// Unix seconds
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub relative_time_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_place_deserializes() {
        let json = serde_json::json!({
            "place_id": "p1",
            "name": "Joe's",
            "geometry": { "location": { "lat": 43.7, "lng": -79.4 } }
        });

        let place: RawPlace = serde_json::from_value(json).unwrap();
        assert_eq!(place.place_id, "p1");
        assert!(place.rating.is_none());
        assert!(place.price_level.is_none());
        assert!(place.photos.is_empty());
        assert!(place.opening_hours.is_none());
        assert!(place.types.is_empty());
    }

    #[test]
    fn test_error_envelope_without_results() {
        let json = serde_json::json!({
            "status": "OVER_QUERY_LIMIT",
            "error_message": "quota"
        });

        let response: NearbySearchResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.status, "OVER_QUERY_LIMIT");
        assert_eq!(response.error_message.as_deref(), Some("quota"));
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_details_serialize_camel_case() {
        let details = PlaceDetails {
            price_level: Some(2),
            user_ratings_total: Some(120),
            website: Some("https://joes.example".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["priceLevel"], 2);
        assert_eq!(value["userRatingsTotal"], 120);
        assert_eq!(value["website"], "https://joes.example");
    }
}
