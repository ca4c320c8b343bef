//! Feed command handler
//!
//! Assembles one feed from the stored preferences and prints it.

use crate::cli::open_store;
use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::feed::{FeedAssembler, FeedState};
use crate::format::{available_formats, get_formatter};
use crate::geo::LocationResolver;
use crate::places::PlacesClient;
use crate::preferences::PreferenceStore;
use clap::Args;

/// Feed command arguments
#[derive(Args)]
pub struct FeedArgs {
    /// Latitude (manual location, requires --lng)
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude (manual location, requires --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Show at most N restaurants
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the feed command
pub async fn run(args: FeedArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let formatter = get_formatter(&args.format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", args.format)))?;

    let config = Config::load()?;
    let prefs = PreferenceStore::load(open_store(&config)?).get().clone();

    let manual = Coordinates::manual(args.lat, args.lng);
    if let Some(coords) = manual {
        coords.validate()?;
    }
    let location = LocationResolver::from_config(&config).resolve(manual).await;
    eprintln!("Searching within {} km of {}", prefs.max_distance, location);

    let assembler = FeedAssembler::new(PlacesClient::from_config(&config.places)?);
    let result = assembler.assemble(&prefs, Ok(location)).await;

    let mut restaurants = match FeedState::from_result(result) {
        FeedState::Failed(message) => return Err(Error::Feed(message)),
        state => state.restaurants().to_vec(),
    };
    if let Some(limit) = args.limit {
        restaurants.truncate(limit);
    }

    let output = formatter.format("Nearby restaurants", Some(location), &restaurants)?;
    println!("{}", output);

    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:<6} - {}", format.name, format.description);
    }
}
