//! Output formatters
//!
//! Trait-based rendering of restaurant lists for the CLI.

pub mod json;
pub mod text;

use crate::coord::Coordinates;
use crate::error::Result;
use crate::restaurant::Restaurant;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a list of restaurants
    ///
    /// # Arguments
    /// * `title` - Heading for the list (feed, liked, ...)
    /// * `location` - Where distances were measured from, if known
    /// * `restaurants` - The restaurants, in display order
    fn format(
        &self,
        title: &str,
        location: Option<Coordinates>,
        restaurants: &[Restaurant],
    ) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [get_formatter("text"), get_formatter("json")]
        .into_iter()
        .flatten()
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
        })
        .collect()
}
