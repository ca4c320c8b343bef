//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod details;
pub mod feed;
pub mod liked;
pub mod prefs;
pub mod serve;
pub mod status;

use crate::config::Config;
use crate::error::Result;
use crate::storage::{FileStore, KeyValueStore};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Swipe through nearby restaurants
#[derive(Parser)]
#[command(name = "numnum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log progress to stderr (RUST_LOG overrides the level)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Assemble a feed of nearby restaurants
    Feed(feed::FeedArgs),

    /// Show details and reviews for a place
    Details(details::DetailsArgs),

    /// View and manage liked restaurants
    Liked(liked::LikedArgs),

    /// View and change preferences
    Prefs(prefs::PrefsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show configuration and server status
    Status(status::StatusArgs),
}

/// Install the tracing subscriber
///
/// `default_level` applies when RUST_LOG is unset.
pub fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Key-value store in the configured data directory
pub fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    Ok(Arc::new(FileStore::new(config.data_dir()?)))
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        init_logging("debug");
    } else if !matches!(cli.command, Commands::Serve(_)) {
        init_logging("warn");
    }

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Feed(args) => feed::run(args).await,
        Commands::Details(args) => details::run(args).await,
        Commands::Liked(args) => liked::run(args),
        Commands::Prefs(args) => prefs::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
    }
}
