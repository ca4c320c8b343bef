//! numnum: swipe-style nearby restaurant discovery
//!
//! A library, CLI and web service that finds restaurants around the user via
//! the Google Places web service, filters them by stored preferences and
//! walks them one at a time, keeping a persisted list of likes.
//!
//! ## Features
//!
//! - Location resolution with manual override, IP detection and a fallback
//! - Nearby search, normalization and categorization of provider records
//! - Haversine distance filtering against the preferred radius
//! - Swipe cursor with like/save and a persisted liked list
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use numnum::coord::distance::distance_km;
//! use numnum::restaurant::categorize;
//! use numnum::Coordinates;
//!
//! let types = categorize(&["restaurant", "italian", "point_of_interest"]);
//! assert_eq!(types.primary, "restaurant");
//! assert_eq!(types.cuisines, vec!["italian"]);
//!
//! let user = Coordinates::new(43.71, -79.41);
//! let place = Coordinates::new(43.7, -79.4);
//! println!("{:.2} km away", distance_km(user, place));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod feed;
pub mod format;
pub mod geo;
pub mod liked;
pub mod places;
pub mod preferences;
pub mod restaurant;
pub mod server;
pub mod storage;
pub mod swipe;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use feed::{FeedAssembler, FeedState};
pub use restaurant::Restaurant;
