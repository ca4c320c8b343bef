//! Details command handler
//!
//! Looks up extended details or reviews for one place.

use crate::config::Config;
use crate::error::Result;
use crate::places::{PlaceDetails, PlacesClient, PlacesGateway};
use crate::restaurant::{price_symbols, Review};
use clap::Args;

/// Details command arguments
#[derive(Args)]
pub struct DetailsArgs {
    /// Provider place ID
    pub place_id: String,

    /// Fetch only the reviews
    #[arg(long)]
    pub reviews_only: bool,

    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the details command
pub async fn run(args: DetailsArgs) -> Result<()> {
    let config = Config::load()?;
    let client = PlacesClient::from_config(&config.places)?;

    if args.reviews_only {
        let reviews = Review::from_raw_list(&client.fetch_reviews(&args.place_id).await?);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&reviews)?);
        } else {
            print_reviews(&reviews);
        }
        return Ok(());
    }

    let details = client.fetch_details(&args.place_id).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        print_details(&details);
    }

    Ok(())
}

fn print_details(details: &PlaceDetails) {
    let price = price_symbols(details.price_level);
    println!("Price:   {}", if price.is_empty() { "-" } else { price.as_str() });

    match (details.rating, details.user_ratings_total) {
        (Some(rating), Some(total)) => println!("Rating:  {:.1} ({} ratings)", rating, total),
        (Some(rating), None) => println!("Rating:  {:.1}", rating),
        _ => println!("Rating:  -"),
    }

    if let Some(website) = &details.website {
        println!("Website: {}", website);
    }

    if let Some(hours) = &details.opening_hours {
        match hours.open_now {
            Some(true) => println!("Open now"),
            Some(false) => println!("Closed now"),
            None => {}
        }
        for line in &hours.weekday_text {
            println!("  {}", line);
        }
    }

    if let Some(types) = details.types.as_ref().filter(|t| !t.is_empty()) {
        println!("Types:   {}", types.join(", "));
    }

    println!();
    let reviews = details.reviews.as_deref().map(Review::from_raw_list).unwrap_or_default();
    print_reviews(&reviews);
}

fn print_reviews(reviews: &[Review]) {
    if reviews.is_empty() {
        println!("No reviews available.");
        return;
    }

    println!("Reviews ({}):", reviews.len());
    for review in reviews {
        let when = review
            .published_at
            .map(|t| t.format(" on %Y-%m-%d").to_string())
            .unwrap_or_default();
        let author = if review.author.is_empty() { "Anonymous" } else { review.author.as_str() };
        println!("\n  {:.0}/5 by {}{} ({})", review.rating, author, when, review.source);
        if !review.text.is_empty() {
            println!("  {}", review.text);
        }
    }
}
