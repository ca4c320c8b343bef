//! Error types for numnum

use thiserror::Error;

/// Main error type for numnum operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Required inputs were missing or malformed; raised before any network call
    #[error("{0}")]
    BadRequest(String),

    /// The places provider answered with a non-success status
    #[error("Google Places API Error: {status}{}", gateway_detail(.message))]
    Gateway {
        status: String,
        message: Option<String>,
    },

    /// Transport-level failure on a supplementary lookup
    #[error("{0}")]
    FetchFailed(String),

    /// Unexpected failure while assembling a feed
    #[error("{0}")]
    Feed(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

fn gateway_detail(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(" - {}", m),
        _ => String::new(),
    }
}

/// Result type alias for numnum operations
pub type Result<T> = std::result::Result<T, Error>;
