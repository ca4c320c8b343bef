//! JSON output formatter

use crate::coord::Coordinates;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::restaurant::Restaurant;

/// JSON formatter - outputs the list as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON records"
    }

    fn format(
        &self,
        title: &str,
        location: Option<Coordinates>,
        restaurants: &[Restaurant],
    ) -> Result<String> {
        let body = serde_json::json!({
            "title": title,
            "location": location,
            "count": restaurants.len(),
            "restaurants": restaurants,
        });
        Ok(serde_json::to_string_pretty(&body)?)
    }
}
