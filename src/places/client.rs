//! HTTP client for the Google Places web service
//!
//! Wraps `reqwest` with provider status handling. Every envelope carries a
//! `status` string; anything other than success surfaces as
//! [`Error::Gateway`] with the provider's message.

use crate::config::PlacesConfig;
use crate::constants::places::{DETAIL_FIELDS, REVIEW_FIELDS, SEARCH_PLACE_TYPE};
use crate::error::{Error, Result};
use crate::places::types::{DetailsResponse, NearbySearchResponse, PlaceDetails, RawPlace, RawReview};
use crate::places::{NearbyQuery, PhotoEndpoint, PlacesGateway};
use std::time::Duration;
use tracing::{debug, warn};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
const STATUS_INVALID_REQUEST: &str = "INVALID_REQUEST";

const DETAILS_FAILED: &str = "Failed to fetch place details";
const REVIEWS_FAILED: &str = "Failed to fetch reviews";

/// Request URLs carry the API key, so they never reach error text
fn transport(e: reqwest::Error) -> Error {
    Error::Http(e.without_url())
}

/// Client for the place web service
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    photos: PhotoEndpoint,
}

impl PlacesClient {
    /// Create a client pointed at the production service
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self> {
        Self::with_base_url(api_key, timeout_secs, crate::constants::api::PLACES_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock)
    pub fn with_base_url(api_key: &str, timeout_secs: u64, base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("numnum/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            photos: PhotoEndpoint::new(base_url.clone(), api_key),
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Create a client from the `[places]` config section
    pub fn from_config(config: &PlacesConfig) -> Result<Self> {
        Self::with_base_url(&config.api_key, config.timeout_secs, &config.base_url)
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}/json", self.base_url, name)
    }

    fn with_key(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        if !self.api_key.is_empty() {
            params.push(("key", self.api_key.clone()));
        }
        params
    }

    /// Issue a detail request for the given field mask
    ///
    /// Transport and decoding failures collapse to [`Error::FetchFailed`]
    /// carrying `failure`.
    async fn details_request(
        &self,
        place_id: &str,
        fields: &str,
        failure: &str,
    ) -> Result<Option<PlaceDetails>> {
        let place_id = place_id.trim();
        if place_id.is_empty() {
            return Err(Error::Gateway {
                status: STATUS_INVALID_REQUEST.to_string(),
                message: Some("Missing place ID".to_string()),
            });
        }

        let params = self.with_key(vec![
            ("place_id", place_id.to_string()),
            ("fields", fields.to_string()),
        ]);

        let response = self
            .client
            .get(self.endpoint("details"))
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                warn!("Detail request for {} failed: {}", place_id, e.without_url());
                Error::FetchFailed(failure.to_string())
            })?;

        let data: DetailsResponse = response.json().await.map_err(|e| {
            warn!("Detail response for {} unreadable: {}", place_id, e.without_url());
            Error::FetchFailed(failure.to_string())
        })?;

        if data.status != STATUS_OK {
            return Err(Error::Gateway {
                status: data.status,
                message: data.error_message,
            });
        }

        Ok(data.result)
    }
}

impl PlacesGateway for PlacesClient {
    async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<RawPlace>> {
        query.validate()?;

        let mut params = vec![
            ("location", query.center.to_query_value()),
            ("radius", query.radius_meters().to_string()),
            ("type", SEARCH_PLACE_TYPE.to_string()),
        ];
        if let Some(keyword) = query.keyword_filter() {
            params.push(("keyword", keyword));
        }
        if let Some(max_price) = query.max_price {
            params.push(("maxprice", max_price.to_string()));
        }
        let params = self.with_key(params);

        debug!(
            "Nearby search at {} within {}m",
            query.center,
            query.radius_meters()
        );

        let data: NearbySearchResponse = self
            .client
            .get(self.endpoint("nearbysearch"))
            .query(&params)
            .send()
            .await
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)?;

        match data.status.as_str() {
            STATUS_OK => {
                debug!("Nearby search returned {} places", data.results.len());
                Ok(data.results)
            }
            STATUS_ZERO_RESULTS => Ok(Vec::new()),
            _ => Err(Error::Gateway {
                status: data.status,
                message: data.error_message,
            }),
        }
    }

    async fn fetch_details(&self, place_id: &str) -> Result<PlaceDetails> {
        let details = self
            .details_request(place_id, DETAIL_FIELDS, DETAILS_FAILED)
            .await?;
        Ok(details.unwrap_or_default())
    }

    async fn fetch_reviews(&self, place_id: &str) -> Result<Vec<RawReview>> {
        let details = self
            .details_request(place_id, REVIEW_FIELDS, REVIEWS_FAILED)
            .await?;
        Ok(details.and_then(|d| d.reviews).unwrap_or_default())
    }

    fn photos(&self) -> &PhotoEndpoint {
        &self.photos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> PlacesClient {
        PlacesClient::with_base_url("test-key", 5, base_url).unwrap()
    }

    fn toronto_query() -> NearbyQuery {
        NearbyQuery::new(Coordinates::new(43.71, -79.41), 10.0)
    }

    #[tokio::test]
    async fn test_search_nearby_sends_expected_parameters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/nearbysearch/json"))
            .and(query_param("location", "43.71,-79.41"))
            .and(query_param("radius", "10000"))
            .and(query_param("type", "restaurant"))
            .and(query_param("keyword", "italian|sushi"))
            .and(query_param("maxprice", "2"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "results": [{
                    "place_id": "p1",
                    "name": "Joe's",
                    "geometry": { "location": { "lat": 43.7, "lng": -79.4 } },
                    "types": ["restaurant", "italian"]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let query = toronto_query()
            .with_keywords(["italian", "sushi"])
            .with_max_price(Some(2));
        let places = client.search_nearby(&query).await.unwrap();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].place_id, "p1");
    }

    #[tokio::test]
    async fn test_search_nearby_omits_empty_keyword() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/nearbysearch/json"))
            .and(query_param_is_missing("keyword"))
            .and(query_param_is_missing("maxprice"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "OK", "results": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let places = client.search_nearby(&toronto_query()).await.unwrap();
        assert!(places.is_empty());
    }

    #[tokio::test]
    async fn test_search_nearby_zero_results_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/nearbysearch/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "ZERO_RESULTS", "results": [] })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.search_nearby(&toronto_query()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_nearby_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/nearbysearch/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OVER_QUERY_LIMIT",
                "error_message": "You have exceeded your daily request quota for this API.",
                "results": []
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.search_nearby(&toronto_query()).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Google Places API Error: OVER_QUERY_LIMIT - You have exceeded your daily request quota for this API."
        );
    }

    #[tokio::test]
    async fn test_search_nearby_invalid_query_never_hits_network() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let query = NearbyQuery::new(Coordinates::new(43.71, -79.41), 0.0);
        let err = client.search_nearby(&query).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_fetch_details_uses_field_mask() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/details/json"))
            .and(query_param("place_id", "p1"))
            .and(query_param(
                "fields",
                "price_level,types,rating,user_ratings_total,reviews,website,opening_hours",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "result": {
                    "price_level": 3,
                    "rating": 4.6,
                    "user_ratings_total": 812,
                    "website": "https://joes.example",
                    "opening_hours": { "open_now": true },
                    "reviews": [{
                        "author_name": "Sam",
                        "rating": 5,
                        "text": "Great pasta",
                        "time": 1700000000
                    }]
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let details = client.fetch_details("p1").await.unwrap();

        assert_eq!(details.price_level, Some(3));
        assert_eq!(details.user_ratings_total, Some(812));
        assert_eq!(details.website.as_deref(), Some("https://joes.example"));
        assert_eq!(details.reviews.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_details_missing_id() {
        let client = test_client("http://127.0.0.1:9");
        let err = client.fetch_details("  ").await.unwrap_err();
        assert!(matches!(err, Error::Gateway { ref status, .. } if status == "INVALID_REQUEST"));
    }

    #[tokio::test]
    async fn test_fetch_details_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/details/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "NOT_FOUND" })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.fetch_details("gone").await.unwrap_err();
        assert_eq!(err.to_string(), "Google Places API Error: NOT_FOUND");
    }

    #[tokio::test]
    async fn test_fetch_details_transport_failure() {
        // Nothing listens on the discard port
        let client = test_client("http://127.0.0.1:9");
        let err = client.fetch_details("p1").await.unwrap_err();
        assert!(matches!(err, Error::FetchFailed(ref m) if m == "Failed to fetch place details"));
    }

    #[tokio::test]
    async fn test_search_transport_failure_hides_key() {
        let client = test_client("http://127.0.0.1:9");
        let err = client.search_nearby(&toronto_query()).await.unwrap_err();

        assert!(matches!(err, Error::Http(_)));
        let message = err.to_string();
        assert!(!message.contains("key="), "key leaked: {}", message);
        assert!(!message.contains("test-key"), "key leaked: {}", message);
    }

    #[tokio::test]
    async fn test_search_unreadable_body_hides_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/nearbysearch/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.search_nearby(&toronto_query()).await.unwrap_err();
        assert!(!err.to_string().contains("test-key"));
    }

    #[tokio::test]
    async fn test_fetch_reviews_defaults_to_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/details/json"))
            .and(query_param("fields", "reviews"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "OK", "result": {} })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.fetch_reviews("p1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_reviews_transport_failure() {
        let client = test_client("http://127.0.0.1:9");
        let err = client.fetch_reviews("p1").await.unwrap_err();
        assert!(matches!(err, Error::FetchFailed(ref m) if m == "Failed to fetch reviews"));
    }

    #[test]
    fn test_photo_endpoint_shares_base_url() {
        let client = test_client("http://localhost:1234/");
        assert_eq!(
            client.photos().url_for("abc"),
            "http://localhost:1234/photo?maxwidth=400&photo_reference=abc&key=test-key"
        );
        assert!(client.has_api_key());
    }
}
