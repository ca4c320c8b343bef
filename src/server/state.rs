//! Server shared state
//!
//! Holds configuration, the places client and the two stores. All mutable
//! state sits behind `tokio` locks; when both are needed, the feed session
//! is locked before the liked store.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::feed::{FeedAssembler, FeedSession, FeedState};
use crate::geo::ip_location::IpLocator;
use crate::geo::LocationResolver;
use crate::liked::LikedStore;
use crate::places::PlacesClient;
use crate::preferences::PreferenceStore;
use crate::storage::{FileStore, KeyValueStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    assembler: FeedAssembler<PlacesClient>,
    resolver: LocationResolver<IpLocator>,

    /// Location set explicitly by the client, wins over detection
    manual_location: RwLock<Option<Coordinates>>,
    /// Location the latest feed was assembled around
    last_location: RwLock<Option<Coordinates>>,

    pub preferences: RwLock<PreferenceStore>,
    pub liked: RwLock<LikedStore>,
    pub session: RwLock<FeedSession>,

    started_at: DateTime<Utc>,
}

impl AppState {
    /// Create application state with stores in the configured data directory
    pub fn new(config: Config) -> Result<Self> {
        let store = Arc::new(FileStore::new(config.data_dir()?));
        info!("Storing records in {}", store.dir().display());
        Self::with_store(config, store)
    }

    /// Create application state over an explicit key-value store
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let client = PlacesClient::from_config(&config.places)?;
        let resolver = LocationResolver::from_config(&config);
        let delay = config.swipe_delay();

        Ok(Self {
            assembler: FeedAssembler::new(client),
            resolver,
            manual_location: RwLock::new(None),
            last_location: RwLock::new(None),
            preferences: RwLock::new(PreferenceStore::load(store.clone())),
            liked: RwLock::new(LikedStore::load(store)),
            session: RwLock::new(FeedSession::new(delay)),
            started_at: Utc::now(),
            config,
        })
    }

    /// The places client
    pub fn places(&self) -> &PlacesClient {
        self.assembler.gateway()
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }

    /// Record a manual location for subsequent feeds
    pub async fn set_manual_location(&self, location: Coordinates) {
        *self.manual_location.write().await = Some(location);
    }

    /// Resolve where the user is right now
    pub async fn resolve_location(&self) -> Coordinates {
        let manual = *self.manual_location.read().await;
        self.resolver.resolve(manual).await
    }

    /// Location the latest feed was built around, if any
    pub async fn last_location(&self) -> Option<Coordinates> {
        *self.last_location.read().await
    }

    /// Assemble a new feed, superseding any refresh still in flight
    ///
    /// Returns the session's state afterwards, which is still `Loading` if a
    /// newer refresh started meanwhile.
    pub async fn refresh_feed(&self) -> FeedState {
        let generation = self.session.write().await.begin();

        let location = self.resolve_location().await;
        let prefs = self.preferences.read().await.get().clone();
        let result = self.assembler.assemble(&prefs, Ok(location)).await;

        let mut session = self.session.write().await;
        if session.complete(generation, result) {
            *self.last_location.write().await = Some(location);
        }
        session.state().clone()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::preferences::PreferencesUpdate;
    use crate::storage::MemoryStore;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) fn test_config(base_url: &str) -> Config {
        let mut config = Config::default();
        config.places.base_url = base_url.to_string();
        config.places.api_key = "test-key".to_string();
        config.location.detect = false;
        config.feed.swipe_delay_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_refresh_uses_fallback_and_preferences() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/nearbysearch/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "results": [{
                    "place_id": "near",
                    "name": "Near",
                    "geometry": { "location": { "lat": 44.226, "lng": -76.495 } }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = AppState::with_store(test_config(&server.uri()), Arc::new(MemoryStore::new())).unwrap();
        state
            .preferences
            .write()
            .await
            .update(PreferencesUpdate { max_distance: Some(2.0), ..Default::default() })
            .unwrap();

        let feed = state.refresh_feed().await;

        assert_eq!(feed.restaurants().len(), 1);
        assert_eq!(state.last_location().await, Some(state.config.fallback_location()));
        assert_eq!(state.session.read().await.current().unwrap().id, "near");
    }

    #[tokio::test]
    async fn test_manual_location_wins() {
        let state = AppState::with_store(test_config("http://127.0.0.1:9"), Arc::new(MemoryStore::new())).unwrap();
        let manual = Coordinates::new(43.7, -79.4);

        state.set_manual_location(manual).await;
        assert_eq!(state.resolve_location().await, manual);
    }

    #[tokio::test]
    async fn test_refresh_failure_is_generic_feed_error() {
        // Nothing listens on port 9, so the search fails at the transport level
        let state = AppState::with_store(test_config("http://127.0.0.1:9"), Arc::new(MemoryStore::new())).unwrap();

        let feed = state.refresh_feed().await;
        assert_eq!(
            feed,
            FeedState::Failed("An error occurred while fetching restaurants".to_string())
        );
    }
}
