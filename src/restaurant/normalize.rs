//! Place normalization
//!
//! Maps one raw provider record to a [`Restaurant`]. Pure and deterministic:
//! the same record always yields the same restaurant, with website and
//! reviews left blank for the detail lookup.

use crate::constants::places::PLACEHOLDER_IMAGE;
use crate::coord::Coordinates;
use crate::places::{PhotoEndpoint, RawPlace};
use crate::restaurant::{Restaurant, RestaurantType};

/// Tags that can serve as the primary category
pub const PRIMARY_TAGS: [&str; 4] = ["restaurant", "cafe", "bar", "bakery"];

/// Tags recognized as cuisines
pub const CUISINE_TAGS: [&str; 12] = [
    "italian",
    "french",
    "mexican",
    "chinese",
    "japanese",
    "indian",
    "american",
    "pizza",
    "seafood",
    "sushi",
    "vegetarian",
    "vegan",
];

/// Tags the provider attaches to nearly everything
const GENERIC_TAGS: [&str; 2] = ["point_of_interest", "establishment"];

/// Tags skipped when choosing the display cuisine
const NON_CUISINE_DISPLAY_TAGS: [&str; 2] = ["restaurant", "food"];

const DEFAULT_PRIMARY: &str = "restaurant";
const DEFAULT_CUISINE: &str = "Restaurant";

fn is_primary(tag: &str) -> bool {
    PRIMARY_TAGS.contains(&tag)
}

fn is_cuisine(tag: &str) -> bool {
    CUISINE_TAGS.contains(&tag)
}

/// Split raw tags into primary category, cuisines and attributes
///
/// Matching is exact and case-sensitive. The first primary tag in provider
/// order wins; cuisines and attributes keep provider order and duplicates.
pub fn categorize<S: AsRef<str>>(tags: &[S]) -> RestaurantType {
    let primary = tags
        .iter()
        .map(AsRef::as_ref)
        .find(|t| is_primary(t))
        .unwrap_or(DEFAULT_PRIMARY)
        .to_string();

    let cuisines = tags
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| is_cuisine(t))
        .map(str::to_string)
        .collect();

    let attributes = tags
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| !is_primary(t) && !is_cuisine(t) && !GENERIC_TAGS.contains(t))
        .map(str::to_string)
        .collect();

    RestaurantType {
        primary,
        cuisines,
        attributes,
    }
}

/// First tag that is neither "restaurant" nor "food", else "Restaurant"
pub fn display_cuisine<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(AsRef::as_ref)
        .find(|t| !NON_CUISINE_DISPLAY_TAGS.contains(t))
        .unwrap_or(DEFAULT_CUISINE)
        .to_string()
}

/// Render a price level as repeated "$"
///
/// Absent levels render empty; levels above 4 are capped.
pub fn price_symbols(level: Option<u8>) -> String {
    "$".repeat(usize::from(level.unwrap_or(0).min(4)))
}

/// Photo URL for the first photo, or the placeholder
pub fn image_for(place: &RawPlace, photos: &PhotoEndpoint) -> String {
    place
        .photos
        .first()
        .map(|p| photos.url_for(&p.photo_reference))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

/// Normalize a raw place into a restaurant
pub fn normalize(place: &RawPlace, photos: &PhotoEndpoint) -> Restaurant {
    Restaurant {
        id: place.place_id.clone(),
        name: place.name.clone(),
        cuisine: display_cuisine(&place.types),
        rating: place.rating.unwrap_or(0.0),
        price_range: price_symbols(place.price_level),
        distance: 0.0,
        is_open: place
            .opening_hours
            .as_ref()
            .and_then(|h| h.open_now)
            .unwrap_or(false),
        image: image_for(place, photos),
        website: String::new(),
        reviews: Vec::new(),
        location: Coordinates::new(place.geometry.location.lat, place.geometry.location.lng),
        types: categorize(&place.types),
    }
}
