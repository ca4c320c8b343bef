//! Liked restaurant storage
//!
//! An ordered list of restaurants, unique by id, persisted under
//! `likedRestaurants`. Every mutation rewrites the whole list.

use crate::constants::storage::LIKED_KEY;
use crate::error::Error;
use crate::restaurant::Restaurant;
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Liked list manager
#[derive(Debug)]
pub struct LikedStore {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<Restaurant>,
}

impl LikedStore {
    /// Load the liked list, starting empty if it cannot be read
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(LIKED_KEY) {
            Ok(Some(content)) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Failed to parse liked restaurants: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load liked restaurants: {}", e);
                Vec::new()
            }
        };

        Self { store, entries }
    }

    /// Add a restaurant; returns false if the id was already liked
    ///
    /// The first stored copy wins, later adds never overwrite it.
    pub fn add(&mut self, restaurant: Restaurant) -> bool {
        if self.contains(&restaurant.id) {
            debug!("Restaurant {} already liked", restaurant.id);
            return false;
        }
        self.entries.push(restaurant);
        self.persist();
        true
    }

    /// Remove a restaurant by id; returns false if it was not liked
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.id != id);
        if self.entries.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// All liked restaurants, oldest first
    pub fn list(&self) -> &[Restaurant] {
        &self.entries
    }

    /// Look up a liked restaurant by id
    pub fn get(&self, id: &str) -> Option<&Restaurant> {
        self.entries.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(Error::from)
            .and_then(|content| self.store.set(LIKED_KEY, &content));

        if let Err(e) = result {
            warn!("Failed to save liked restaurants: {}", e);
        }
    }
}
