//! PodSearch - fuzzy search over a podcast directory
//!
//! Loads the show catalog once, builds a fuzzy index over the show titles,
//! and drives a search box whose dropdown follows the user's typing after a
//! short quiet period.
//!
//! # Features
//!
//! - **One-shot catalog load**: fetched on a background thread, never retried
//! - **Fuzzy title search**: ranked subsequence matching with an edit-distance
//!   fallback for typos, case-insensitive, with scores
//! - **Debounced lookups**: only the last keystroke of a burst triggers a search
//! - **Terminal front end**: dropdown, mouse dismissal and a details dialog
//!
//! # Example
//!
//! ```no_run
//! use podsearch::{catalog, SearchWidget, DEFAULT_DEBOUNCE, DEFAULT_ENDPOINT};
//! use std::time::Instant;
//!
//! fn main() -> podsearch::Result<()> {
//!     let shows = catalog::fetch_catalog(&catalog::client()?, DEFAULT_ENDPOINT)?;
//!
//!     let mut widget = SearchWidget::new(DEFAULT_DEBOUNCE);
//!     widget.catalog_loaded(shows);
//!
//!     let now = Instant::now();
//!     widget.handle_input("daily", now);
//!     widget.tick(now + DEFAULT_DEBOUNCE);
//!
//!     for show in widget.results() {
//!         println!("{}: {}", show.id, show.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod debounce;
pub mod error;
pub mod index;
pub mod logging;
pub mod show;
pub mod tui;
pub mod widget;

use std::path::PathBuf;
use std::time::Duration;

// Re-export main types
pub use catalog::{BgMessage, CatalogLoader};
pub use debounce::{Debouncer, TimerId};
pub use error::{PodSearchError, Result};
pub use index::{IndexOptions, MatchKind, SearchHit, SearchIndex};
pub use show::Show;
pub use widget::{Dropdown, LoadState, ResultRow, SearchWidget};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Catalog endpoint
pub const DEFAULT_ENDPOINT: &str = "https://podcast-api.netlify.app/shows";

/// Quiet period before a lookup runs
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Catalog URL
    pub endpoint: String,
    /// Debounce delay for lookups
    pub debounce: Duration,
    /// Log file; `None` uses the default beside the executable
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            debounce: DEFAULT_DEBOUNCE,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Resolved log file path
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(logging::default_log_path)
    }
}
