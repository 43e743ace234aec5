//! Error types for PodSearch
//!
//! Every failure originates in the catalog loader or the terminal host;
//! the widget itself has no error paths.

use thiserror::Error;

/// Main error type for PodSearch operations
#[derive(Error, Debug)]
pub enum PodSearchError {
    /// The catalog endpoint answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    Fetch { status: u16 },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed catalog: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result type alias for PodSearch operations
pub type Result<T> = std::result::Result<T, PodSearchError>;

impl PodSearchError {
    /// HTTP status carried by a `Fetch` error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            PodSearchError::Fetch { status } => Some(*status),
            PodSearchError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short text for the status line
    pub fn summary(&self) -> String {
        match self {
            PodSearchError::Fetch { status } => format!("catalog unavailable (HTTP {})", status),
            PodSearchError::Http(_) => "catalog unreachable".to_string(),
            PodSearchError::Decode(_) => "catalog could not be parsed".to_string(),
            other => other.to_string(),
        }
    }
}
