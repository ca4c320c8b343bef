//! User preference storage
//!
//! One persisted record under `userPreferences`. Loaded once at startup,
//! every update rewrites the full record. Storage trouble is logged and the
//! in-memory copy stays authoritative for the session.

use crate::constants::storage::PREFERENCES_KEY;
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

const DEFAULT_PRICE_RANGE: u8 = 2;
const DEFAULT_MAX_DISTANCE_KM: f64 = 10.0;

/// What the user wants to see
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub selected_cuisines: BTreeSet<String>,
    /// Collected but not applied to the feed
    #[serde(default)]
    pub selected_dietary_restrictions: BTreeSet<String>,
    /// Price ceiling, 1 to 4
    #[serde(default = "default_price_range")]
    pub price_range: u8,
    /// Kilometers, > 0
    #[serde(default = "default_max_distance")]
    pub max_distance: f64,
}

fn default_price_range() -> u8 {
    DEFAULT_PRICE_RANGE
}
fn default_max_distance() -> f64 {
    DEFAULT_MAX_DISTANCE_KM
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            selected_cuisines: BTreeSet::new(),
            selected_dietary_restrictions: BTreeSet::new(),
            price_range: DEFAULT_PRICE_RANGE,
            max_distance: DEFAULT_MAX_DISTANCE_KM,
        }
    }
}

/// A partial change to preferences; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub selected_cuisines: Option<Vec<String>>,
    pub selected_dietary_restrictions: Option<Vec<String>>,
    pub price_range: Option<u8>,
    pub max_distance: Option<f64>,
}

fn clean_set(values: Vec<String>) -> BTreeSet<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::to_string).collect()
}

impl UserPreferences {
    /// Check ranges
    pub fn validate(&self) -> Result<()> {
        if !(1..=4).contains(&self.price_range) {
            return Err(Error::BadRequest(format!(
                "Price range must be between 1 and 4, got {}",
                self.price_range
            )));
        }
        if !self.max_distance.is_finite() || self.max_distance <= 0.0 {
            return Err(Error::BadRequest(format!(
                "Max distance must be positive, got {}",
                self.max_distance
            )));
        }
        Ok(())
    }

    /// Return a copy with `update` merged in, validated
    pub fn merged(&self, update: PreferencesUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(cuisines) = update.selected_cuisines {
            next.selected_cuisines = clean_set(cuisines);
        }
        if let Some(dietary) = update.selected_dietary_restrictions {
            next.selected_dietary_restrictions = clean_set(dietary);
        }
        if let Some(price) = update.price_range {
            next.price_range = price;
        }
        if let Some(distance) = update.max_distance {
            next.max_distance = distance;
        }
        next.validate()?;
        Ok(next)
    }

    /// Get a preference by short key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "cuisines" => Some(self.selected_cuisines.iter().cloned().collect::<Vec<_>>().join(",")),
            "dietary" => Some(
                self.selected_dietary_restrictions
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            "price" => Some(self.price_range.to_string()),
            "distance" => Some(self.max_distance.to_string()),
            _ => None,
        }
    }

    /// Turn a short key and text value into an update
    ///
    /// List keys take comma-separated values; an empty value clears the list.
    pub fn parse_update(key: &str, value: &str) -> Result<PreferencesUpdate> {
        let mut update = PreferencesUpdate::default();
        match key {
            "cuisines" => update.selected_cuisines = Some(split_list(value)),
            "dietary" => update.selected_dietary_restrictions = Some(split_list(value)),
            "price" => {
                update.price_range = Some(value.parse().map_err(|_| {
                    Error::BadRequest(format!("Invalid price value: {}", value))
                })?);
            }
            "distance" => {
                update.max_distance = Some(value.parse().map_err(|_| {
                    Error::BadRequest(format!("Invalid distance value: {}", value))
                })?);
            }
            _ => return Err(Error::BadRequest(format!("Unknown preference key: {}", key))),
        }
        Ok(update)
    }

    /// List all preference keys
    pub fn available_keys() -> Vec<&'static str> {
        vec!["cuisines", "dietary", "price", "distance"]
    }

    /// Cuisines as search keywords, in stable order
    pub fn cuisine_keywords(&self) -> Vec<String> {
        self.selected_cuisines.iter().cloned().collect()
    }
}

/// Owner of the persisted preferences record
#[derive(Debug)]
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
    current: UserPreferences,
}

impl PreferenceStore {
    /// Load the stored record, falling back to defaults
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let current = match store.get(PREFERENCES_KEY) {
            Ok(Some(content)) => match serde_json::from_str::<UserPreferences>(&content) {
                Ok(prefs) if prefs.validate().is_ok() => prefs,
                Ok(_) => {
                    warn!("Stored preferences out of range, using defaults");
                    UserPreferences::default()
                }
                Err(e) => {
                    warn!("Failed to parse stored preferences: {}", e);
                    UserPreferences::default()
                }
            },
            Ok(None) => UserPreferences::default(),
            Err(e) => {
                warn!("Failed to load preferences: {}", e);
                UserPreferences::default()
            }
        };

        Self { store, current }
    }

    /// Current preferences
    pub fn get(&self) -> &UserPreferences {
        &self.current
    }

    /// Merge an update and persist the full record
    ///
    /// Only invalid values are an error; persistence failures are logged.
    pub fn update(&mut self, update: PreferencesUpdate) -> Result<&UserPreferences> {
        self.current = self.current.merged(update)?;
        self.persist();
        Ok(&self.current)
    }

    /// Restore defaults and persist
    pub fn reset(&mut self) -> &UserPreferences {
        self.current = UserPreferences::default();
        self.persist();
        &self.current
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.current)
            .map_err(Error::from)
            .and_then(|content| self.store.set(PREFERENCES_KEY, &content));

        if let Err(e) = result {
            warn!("Failed to save preferences: {}", e);
        }
    }
}
