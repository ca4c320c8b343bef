//! Liked command handler
//!
//! View and manage the liked restaurant list.

use crate::cli::open_store;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::get_formatter;
use crate::liked::LikedStore;
use clap::{Args, Subcommand};

/// Liked command arguments
#[derive(Args)]
pub struct LikedArgs {
    #[command(subcommand)]
    pub command: Option<LikedCommand>,

    /// Output format for listing
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

/// Liked subcommands
#[derive(Subcommand)]
pub enum LikedCommand {
    /// List liked restaurants
    List,
    /// Remove a liked restaurant
    Remove {
        /// Restaurant (place) ID
        id: String,
    },
}

/// Run the liked command
pub fn run(args: LikedArgs) -> Result<()> {
    let config = Config::load()?;
    let mut liked = LikedStore::load(open_store(&config)?);

    match args.command.unwrap_or(LikedCommand::List) {
        LikedCommand::List => {
            let formatter = get_formatter(&args.format)
                .ok_or_else(|| Error::Config(format!("Unknown format: {}", args.format)))?;
            println!("{}", formatter.format("Liked restaurants", None, liked.list())?);
        }
        LikedCommand::Remove { id } => {
            if liked.remove(&id) {
                println!("Removed {}", id);
            } else {
                println!("{} was not in the liked list", id);
            }
        }
    }

    Ok(())
}
