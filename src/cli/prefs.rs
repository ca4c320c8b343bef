//! Prefs command handler
//!
//! View and change the stored preferences.

use crate::cli::open_store;
use crate::config::Config;
use crate::error::Result;
use crate::preferences::{PreferenceStore, UserPreferences};
use clap::{Args, Subcommand};

/// Prefs command arguments
#[derive(Args)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub command: Option<PrefsCommand>,
}

/// Prefs subcommands
#[derive(Subcommand)]
pub enum PrefsCommand {
    /// Show all preferences
    Show,
    /// Set a preference (lists are comma-separated)
    Set {
        /// One of: cuisines, dietary, price, distance
        key: String,
        value: String,
    },
    /// Restore defaults
    Reset,
}

/// Run the prefs command
pub fn run(args: PrefsArgs) -> Result<()> {
    let config = Config::load()?;
    let mut store = PreferenceStore::load(open_store(&config)?);

    match args.command.unwrap_or(PrefsCommand::Show) {
        PrefsCommand::Show => show_all(store.get()),
        PrefsCommand::Set { key, value } => {
            let update = UserPreferences::parse_update(&key, &value)?;
            let prefs = store.update(update)?;
            println!("{} = {}", key, prefs.get(&key).unwrap_or_default());
        }
        PrefsCommand::Reset => {
            store.reset();
            println!("Preferences reset to defaults");
        }
    }

    Ok(())
}

fn show_all(prefs: &UserPreferences) {
    for key in UserPreferences::available_keys() {
        println!("{} = {}", key, prefs.get(key).unwrap_or_default());
    }
    if !prefs.selected_dietary_restrictions.is_empty() {
        println!("\nNote: dietary restrictions are saved but do not filter the feed.");
    }
}
