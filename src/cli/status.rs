//! Status command handler
//!
//! Shows configuration health, stored records and whether a server is up.

use crate::cli::open_store;
use crate::config::Config;
use crate::error::Result;
use crate::liked::LikedStore;
use crate::preferences::PreferenceStore;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    if args.server {
        check_server_status(&config).await;
    }

    println!("numnum v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Config:    {}", Config::config_path()?.display());
    println!("Data:      {}", config.data_dir()?.display());
    println!(
        "API key:   {}",
        if config.places.api_key.is_empty() { "NOT CONFIGURED" } else { "configured" }
    );
    println!(
        "Location:  {} (fallback {})",
        if config.location.detect { "IP detection" } else { "fallback only" },
        config.fallback_location()
    );
    println!();

    let store = open_store(&config)?;
    let prefs = PreferenceStore::load(store.clone());
    let liked = LikedStore::load(store);
    let prefs = prefs.get();

    println!("Liked restaurants: {}", liked.len());
    println!(
        "Preferences: {} cuisines, price up to {}, within {} km",
        prefs.selected_cuisines.len(),
        "$".repeat(usize::from(prefs.price_range)),
        prefs.max_distance
    );

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Server: RUNNING on {}", config.server_addr());
                if let Ok(status) = response.json::<serde_json::Value>().await {
                    if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                        println!("  Version: {}", version);
                    }
                    if let Some(uptime) = status.get("uptime_secs").and_then(|v| v.as_u64()) {
                        println!("  Uptime: {}s", uptime);
                    }
                    if let Some(count) = status.get("liked_count").and_then(|v| v.as_u64()) {
                        println!("  Liked: {}", count);
                    }
                }
            } else {
                println!("Server: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
        }
    }
    println!();
}
