//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "places.api_key")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (args.key.as_deref(), args.value.as_deref()) {
        (None, None) => show_all_config(&config),

        (Some(key), None) => {
            let value = config.get(key).ok_or_else(|| unknown_key(key))?;
            println!("{}", value);
        }

        (Some(key), Some(value)) => {
            if config.get(key).is_none() {
                return Err(unknown_key(key));
            }
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, config.get(key).unwrap_or_default());
        }

        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "Unknown config key: {} (available: {})",
        key,
        Config::available_keys().join(", ")
    ))
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!();

    println!("[places]");
    if config.places.api_key.is_empty() {
        println!("api_key = \"\" # not configured");
    } else {
        println!("api_key = \"***\" # configured");
    }
    println!("base_url = \"{}\"", config.places.base_url);
    println!("timeout_secs = {}", config.places.timeout_secs);
    println!();

    println!("[location]");
    println!("detect = {}", config.location.detect);
    println!("cache_lookups = {}", config.location.cache_lookups);
    println!("fallback_lat = {}", config.location.fallback_lat);
    println!("fallback_lng = {}", config.location.fallback_lng);
    println!();

    println!("[feed]");
    println!("swipe_delay_ms = {}", config.feed.swipe_delay_ms);
    println!();

    println!("[storage]");
    if config.storage.data_dir.is_empty() {
        match config.data_dir() {
            Ok(dir) => println!("data_dir = \"\" # {}", dir.display()),
            Err(_) => println!("data_dir = \"\""),
        }
    } else {
        println!("data_dir = \"{}\"", config.storage.data_dir);
    }
}
