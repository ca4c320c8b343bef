//! Human-readable text output formatter

use crate::coord::Coordinates;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::restaurant::Restaurant;

/// Text formatter - one block per restaurant
pub struct TextFormatter;

fn open_label(is_open: bool) -> &'static str {
    if is_open {
        "open now"
    } else {
        "closed"
    }
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(
        &self,
        title: &str,
        location: Option<Coordinates>,
        restaurants: &[Restaurant],
    ) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("{} ({} restaurants)\n", title, restaurants.len()));
        if let Some(location) = location {
            output.push_str(&format!("Near: {}\n", location));
        }

        if restaurants.is_empty() {
            output.push_str("\nNothing here. Try widening your distance or price preferences.\n");
            return Ok(output);
        }

        for (i, r) in restaurants.iter().enumerate() {
            output.push_str(&format!("\n{:>3}. {} [{}]\n", i + 1, r.name, r.id));

            let price = if r.price_range.is_empty() { "-" } else { r.price_range.as_str() };
            output.push_str(&format!(
                "     {} | {:.1} stars | {} | {:.2} km | {}\n",
                r.cuisine,
                r.rating,
                price,
                r.distance,
                open_label(r.is_open)
            ));

            if !r.types.cuisines.is_empty() {
                output.push_str(&format!("     Cuisines: {}\n", r.types.cuisines.join(", ")));
            }
            if !r.website.is_empty() {
                output.push_str(&format!("     {}\n", r.website));
            }
        }

        Ok(output)
    }
}
