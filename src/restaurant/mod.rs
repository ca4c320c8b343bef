//! Restaurant entities
//!
//! The normalized records shown to users and persisted in the liked list.
//! Field names serialize in camelCase so stored records stay readable by the
//! web client.

pub mod normalize;

pub use normalize::{categorize, normalize, price_symbols};

use crate::constants::places::REVIEW_SOURCE;
use crate::coord::Coordinates;
use crate::places::{PlaceDetails, RawReview};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a place's raw category tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantType {
    /// One of restaurant, cafe, bar, bakery
    pub primary: String,
    /// Cuisine tags in provider order
    pub cuisines: Vec<String>,
    /// Everything that is neither primary, cuisine nor generic
    pub attributes: Vec<String>,
}

/// A review attached by the detail lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub text: String,
    /// 0 to 5
    pub rating: f64,
    pub source: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Convert a provider review; `position` stands in for a missing timestamp
    pub fn from_raw(raw: &RawReview, position: usize) -> Self {
        Self {
            id: raw
                .time
                .map(|t| t.to_string())
                .unwrap_or_else(|| position.to_string()),
            text: raw.text.clone().unwrap_or_default(),
            rating: raw.rating.unwrap_or(0.0).clamp(0.0, 5.0),
            source: REVIEW_SOURCE.to_string(),
            author: raw.author_name.clone().unwrap_or_default(),
            published_at: raw.time.and_then(|t| DateTime::from_timestamp(t, 0)),
        }
    }

    /// Convert a list of provider reviews
    pub fn from_raw_list(raw: &[RawReview]) -> Vec<Self> {
        raw.iter()
            .enumerate()
            .map(|(i, r)| Self::from_raw(r, i))
            .collect()
    }
}

/// A normalized restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Provider place id, the dedup key for likes
    pub id: String,
    pub name: String,
    /// Display cuisine derived from raw tags
    pub cuisine: String,
    pub rating: f64,
    /// "$" repeated price-level times
    pub price_range: String,
    /// Kilometers from the user, 0 until computed
    pub distance: f64,
    pub is_open: bool,
    pub image: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub location: Coordinates,
    pub types: RestaurantType,
}

impl Restaurant {
    /// Merge an extended-detail lookup into this restaurant
    ///
    /// Website and reviews are filled in; price, rating and open state are
    /// refreshed only when the lookup carried them.
    pub fn apply_details(&mut self, details: &PlaceDetails) {
        if let Some(website) = &details.website {
            self.website = website.clone();
        }
        if let Some(reviews) = &details.reviews {
            self.reviews = Review::from_raw_list(reviews);
        }
        if let Some(level) = details.price_level {
            self.price_range = price_symbols(Some(level));
        }
        if let Some(rating) = details.rating {
            self.rating = rating;
        }
        if let Some(open_now) = details.opening_hours.as_ref().and_then(|h| h.open_now) {
            self.is_open = open_now;
        }
    }

    /// Price level as a number (length of the "$" string)
    pub fn price_level(&self) -> usize {
        self.price_range.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::types::OpeningHours;

    fn sample() -> Restaurant {
        Restaurant {
            id: "p1".to_string(),
            name: "Joe's".to_string(),
            cuisine: "italian".to_string(),
            rating: 4.2,
            price_range: "$$".to_string(),
            distance: 1.3,
            is_open: false,
            image: "/placeholder.svg".to_string(),
            website: String::new(),
            reviews: Vec::new(),
            location: Coordinates::new(43.7, -79.4),
            types: RestaurantType {
                primary: "restaurant".to_string(),
                cuisines: vec!["italian".to_string()],
                attributes: Vec::new(),
            },
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["priceRange"], "$$");
        assert_eq!(value["isOpen"], false);
        assert_eq!(value["location"]["lat"], 43.7);
        assert_eq!(value["types"]["primary"], "restaurant");
    }

    #[test]
    fn test_apply_details_fills_and_refreshes() {
        let mut restaurant = sample();
        let details = PlaceDetails {
            price_level: Some(3),
            rating: Some(4.7),
            website: Some("https://joes.example".to_string()),
            opening_hours: Some(OpeningHours {
                open_now: Some(true),
                weekday_text: Vec::new(),
            }),
            reviews: Some(vec![RawReview {
                author_name: Some("Sam".to_string()),
                rating: Some(5.0),
                text: Some("Great pasta".to_string()),
                time: Some(1_700_000_000),
                relative_time_description: Some("a year ago".to_string()),
            }]),
            ..Default::default()
        };

        restaurant.apply_details(&details);

        assert_eq!(restaurant.price_range, "$$$");
        assert_eq!(restaurant.price_level(), 3);
        assert_eq!(restaurant.rating, 4.7);
        assert!(restaurant.is_open);
        assert_eq!(restaurant.website, "https://joes.example");
        assert_eq!(restaurant.reviews.len(), 1);

        let review = &restaurant.reviews[0];
        assert_eq!(review.id, "1700000000");
        assert_eq!(review.author, "Sam");
        assert_eq!(review.source, "Google");
        assert_eq!(review.published_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_apply_empty_details_keeps_fields() {
        let mut restaurant = sample();
        restaurant.apply_details(&PlaceDetails::default());
        assert_eq!(restaurant, sample());
    }

    #[test]
    fn test_review_without_time_uses_position() {
        let reviews = Review::from_raw_list(&[RawReview::default(), RawReview::default()]);
        assert_eq!(reviews[0].id, "0");
        assert_eq!(reviews[1].id, "1");
        assert_eq!(reviews[1].rating, 0.0);
        assert!(reviews[1].published_at.is_none());
    }
}
