//! numnum CLI entry point
//!
//! Swipe-style restaurant discovery - CLI + web app

use numnum::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
