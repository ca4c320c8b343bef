//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::coord::Coordinates;
use crate::error::Error;
use crate::feed::FeedState;
use crate::places::{NearbyQuery, PlaceDetails, PlacesGateway, MISSING_PARAMETERS};
use crate::preferences::{PreferencesUpdate, UserPreferences};
use crate::restaurant::{normalize, Restaurant, Review};
use crate::server::state::AppState;
use crate::swipe::CursorState;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const MISSING_PLACE_ID: &str = "Missing place ID";
const SEARCH_FAILED: &str = "Failed to fetch restaurants";

/// Locate the static web client: ./static, else next to the executable
fn static_dir() -> String {
    if std::path::Path::new("static").exists() {
        return "static".to_string();
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
        .filter(|path| path.exists())
        .map(|path| path.to_string_lossy().to_string())
        .unwrap_or_else(|| "static".to_string())
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/restaurants", get(restaurants_handler))
        .route("/api/place-details", get(place_details_handler))
        .route("/api/reviews", get(reviews_handler))
        .route("/api/feed", get(feed_handler))
        .route("/api/feed/refresh", post(feed_refresh_handler))
        .route("/api/feed/reject", post(feed_reject_handler))
        .route("/api/feed/like", post(feed_like_handler))
        .route("/api/feed/save", post(feed_save_handler))
        .route("/api/preferences", get(preferences_handler).put(preferences_update_handler))
        .route("/api/liked", get(liked_handler).post(liked_add_handler))
        .route("/api/liked/:id", delete(liked_delete_handler))
        .route("/api/location", get(location_handler))
        .route("/api/status", get(status_handler))
        .nest_service("/", ServeDir::new(static_dir()).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn bad_request(message: &str) -> Self {
        ApiError {
            error: message.to_string(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    fn fetch_failed(message: &str) -> Self {
        ApiError {
            error: message.to_string(),
            code: "FETCH_FAILED".to_string(),
        }
    }

    /// HTTP status for this error's code
    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "BAD_REQUEST" | "INVALID_COORDINATES" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::BadRequest(_) => "BAD_REQUEST",
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::Gateway { .. } => "PLACES_API_ERROR",
            Error::FetchFailed(_) => "FETCH_FAILED",
            Error::Feed(_) => "FEED_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

/// Nearby search query parameters
///
/// Taken as text so that a blank value counts as missing rather than failing
/// extraction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantsQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    /// Kilometers
    pub radius: Option<String>,
    /// Comma-separated cuisine keywords
    pub cuisine_types: Option<String>,
    pub max_price: Option<String>,
}

/// Value of a parameter, or `None` if absent or blank
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_param<T: FromStr>(name: &str, value: &Option<String>) -> Result<Option<T>, ApiError> {
    present(value)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| ApiError::bad_request(&format!("Invalid {}: {}", name, raw)))
        })
        .transpose()
}

/// Nearby search response
#[derive(Debug, Serialize, Deserialize)]
pub struct RestaurantsResponse {
    pub restaurants: Vec<Restaurant>,
}

/// Search the provider and return normalized restaurants
///
/// GET /api/restaurants
async fn restaurants_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RestaurantsQuery>,
) -> Result<Json<RestaurantsResponse>, ApiError> {
    if [&params.lat, &params.lng, &params.radius]
        .into_iter()
        .any(|v| present(v).is_none())
    {
        return Err(ApiError::bad_request(MISSING_PARAMETERS));
    }

    let keywords: Vec<String> = present(&params.cuisine_types)
        .map(|c| c.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    let query = NearbyQuery::from_parts(
        parse_param("lat", &params.lat)?,
        parse_param("lng", &params.lng)?,
        parse_param("radius", &params.radius)?,
        keywords,
        parse_param("maxPrice", &params.max_price)?,
    )?;

    let places = state
        .places()
        .search_nearby(&query)
        .await
        .map_err(|e| match e {
            Error::Http(_) | Error::Json(_) => {
                warn!("Nearby search failed: {}", e);
                ApiError::fetch_failed(SEARCH_FAILED)
            }
            other => ApiError::from(other),
        })?;
    let restaurants = places
        .iter()
        .map(|place| normalize(place, state.places().photos()))
        .collect();

    Ok(Json(RestaurantsResponse { restaurants }))
}

/// Place id query parameter
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceQuery {
    pub place_id: Option<String>,
}

impl PlaceQuery {
    fn require(&self) -> Result<&str, ApiError> {
        self.place_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::bad_request(MISSING_PLACE_ID))
    }
}

/// Place details response
#[derive(Debug, Serialize)]
pub struct DetailsResponse {
    pub details: PlaceDetails,
}

/// Extended details for one place
///
/// GET /api/place-details
async fn place_details_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlaceQuery>,
) -> Result<Json<DetailsResponse>, ApiError> {
    let place_id = params.require()?;
    let details = state.places().fetch_details(place_id).await?;
    Ok(Json(DetailsResponse { details }))
}

/// Reviews response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<Review>,
}

/// Reviews for one place
///
/// GET /api/reviews
async fn reviews_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlaceQuery>,
) -> Result<Json<ReviewsResponse>, ApiError> {
    let place_id = params.require()?;
    let reviews = state.places().fetch_reviews(place_id).await?;
    Ok(Json(ReviewsResponse {
        reviews: Review::from_raw_list(&reviews),
    }))
}

/// Feed snapshot
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub generation: u64,
    pub feed: FeedState,
    pub cursor: CursorState,
    pub current: Option<Restaurant>,
    pub location: Option<Coordinates>,
}

async fn feed_snapshot(state: &AppState) -> FeedResponse {
    let location = state.last_location().await;
    let session = state.session.read().await;
    FeedResponse {
        generation: session.generation().value(),
        feed: session.state().clone(),
        cursor: session.cursor().state().clone(),
        current: session.current().cloned(),
        location,
    }
}

/// Current feed and cursor
///
/// GET /api/feed
async fn feed_handler(State(state): State<Arc<AppState>>) -> Json<FeedResponse> {
    Json(feed_snapshot(&state).await)
}

/// Optional manual location for a refresh
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Assemble a new feed
///
/// POST /api/feed/refresh
async fn feed_refresh_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<RefreshRequest>>,
) -> Result<Json<FeedResponse>, ApiError> {
    if let Some(Json(req)) = body {
        if let Some(location) = Coordinates::manual(req.lat, req.lng) {
            location.validate()?;
            info!("Manual location set to {}", location);
            state.set_manual_location(location).await;
        }
    }

    state.refresh_feed().await;
    Ok(Json(feed_snapshot(&state).await))
}

/// Result of a cursor transition
#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    /// Restaurant acted on, if the cursor had one
    pub restaurant: Option<Restaurant>,
    /// Restaurant now under the cursor
    pub current: Option<Restaurant>,
}

/// Skip the current restaurant
///
/// POST /api/feed/reject
async fn feed_reject_handler(State(state): State<Arc<AppState>>) -> Json<SwipeResponse> {
    let mut session = state.session.write().await;
    let restaurant = session.current().cloned();
    let current = session.reject().cloned();
    Json(SwipeResponse { restaurant, current })
}

/// Like or star the current restaurant
///
/// The liked store is written under the locks; the presentation delay runs
/// with no lock held and the cursor advances afterwards.
async fn swipe_forward(state: &AppState, star: bool) -> SwipeResponse {
    let owed = {
        let mut session = state.session.write().await;
        let mut liked = state.liked.write().await;
        if star {
            session.save(&mut liked)
        } else {
            session.like(&mut liked)
        }
    };

    let Some((generation, pending)) = owed else {
        return SwipeResponse {
            restaurant: None,
            current: state.session.read().await.current().cloned(),
        };
    };

    pending.wait().await;

    let mut session = state.session.write().await;
    session.settle(generation, &pending);
    SwipeResponse {
        restaurant: Some(pending.restaurant),
        current: session.current().cloned(),
    }
}

/// Like the current restaurant
///
/// POST /api/feed/like
async fn feed_like_handler(State(state): State<Arc<AppState>>) -> Json<SwipeResponse> {
    Json(swipe_forward(&state, false).await)
}

/// Star the current restaurant
///
/// POST /api/feed/save
async fn feed_save_handler(State(state): State<Arc<AppState>>) -> Json<SwipeResponse> {
    Json(swipe_forward(&state, true).await)
}

/// Current preferences
///
/// GET /api/preferences
async fn preferences_handler(State(state): State<Arc<AppState>>) -> Json<UserPreferences> {
    Json(state.preferences.read().await.get().clone())
}

/// Partially update preferences; the feed is rebuilt in the background
///
/// PUT /api/preferences
async fn preferences_update_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<UserPreferences>, ApiError> {
    let prefs = state.preferences.write().await.update(update)?.clone();

    let background = state.clone();
    tokio::spawn(async move {
        background.refresh_feed().await;
    });

    Ok(Json(prefs))
}

/// Liked list response
#[derive(Debug, Serialize, Deserialize)]
pub struct LikedResponse {
    pub restaurants: Vec<Restaurant>,
    pub count: usize,
}

/// List liked restaurants
///
/// GET /api/liked
async fn liked_handler(State(state): State<Arc<AppState>>) -> Json<LikedResponse> {
    let liked = state.liked.read().await;
    Json(LikedResponse {
        restaurants: liked.list().to_vec(),
        count: liked.len(),
    })
}

/// Add outcome
#[derive(Debug, Serialize, Deserialize)]
pub struct LikedAddResponse {
    pub added: bool,
    pub count: usize,
}

/// Like a restaurant directly
///
/// POST /api/liked
async fn liked_add_handler(
    State(state): State<Arc<AppState>>,
    Json(restaurant): Json<Restaurant>,
) -> Result<(StatusCode, Json<LikedAddResponse>), ApiError> {
    if restaurant.id.trim().is_empty() {
        return Err(ApiError::bad_request("Restaurant id is required"));
    }

    let mut liked = state.liked.write().await;
    let added = liked.add(restaurant);
    let status = if added { StatusCode::CREATED } else { StatusCode::OK };

    Ok((
        status,
        Json(LikedAddResponse {
            added,
            count: liked.len(),
        }),
    ))
}

/// Remove a liked restaurant; removing an unknown id is not an error
///
/// DELETE /api/liked/:id
async fn liked_delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    state.liked.write().await.remove(&id);
    StatusCode::NO_CONTENT
}

/// Location response
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    pub location: Coordinates,
    pub fallback: Coordinates,
}

/// Where feeds are currently assembled around
///
/// GET /api/location
async fn location_handler(State(state): State<Arc<AppState>>) -> Json<LocationResponse> {
    Json(LocationResponse {
        location: state.resolve_location().await,
        fallback: state.config.fallback_location(),
    })
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Whether a Places API key is configured
    pub api_key_configured: bool,
    /// Number of liked restaurants
    pub liked_count: usize,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        api_key_configured: state.places().has_api_key(),
        liked_count: state.liked.read().await.len(),
    })
}
