//! Catalog loader
//!
//! Fetches the full show list once and hands it to the UI thread over a
//! channel. There is no retry: a failed load stays failed for the lifetime
//! of the widget.

use crate::error::{PodSearchError, Result};
use crate::show::Show;
use crossbeam_channel::Sender;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info};

const USER_AGENT: &str = concat!("podsearch/", env!("CARGO_PKG_VERSION"));

/// Messages from background threads
#[derive(Debug)]
pub enum BgMessage {
    CatalogLoaded(Vec<Show>),
    CatalogFailed(PodSearchError),
}

/// Build the HTTP client used for catalog requests
pub fn client() -> Result<Client> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

/// Issue one GET against `endpoint` and decode the show list.
pub fn fetch_catalog(client: &Client, endpoint: &str) -> Result<Vec<Show>> {
    let started = Instant::now();
    debug!(endpoint, "requesting catalog");

    let response = client.get(endpoint).send()?;
    let status = response.status();
    let body = response.text()?;
    let shows = read_catalog(status, &body)?;

    info!(
        endpoint,
        shows = shows.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "catalog loaded"
    );
    Ok(shows)
}

/// Status check and JSON decode for a catalog response.
pub fn read_catalog(status: StatusCode, body: &str) -> Result<Vec<Show>> {
    if !status.is_success() {
        return Err(PodSearchError::Fetch {
            status: status.as_u16(),
        });
    }
    Ok(serde_json::from_str(body)?)
}

/// Runs the catalog fetch on its own thread.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Start the one-shot load. The result arrives on `tx`; if the receiving
    /// side has already gone away the result is dropped.
    pub fn spawn(endpoint: String, tx: Sender<BgMessage>) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let result = client().and_then(|c| fetch_catalog(&c, &endpoint));
            if let Err(e) = &result {
                error!(endpoint = %endpoint, error = %e, "catalog load failed");
            }
            post_result(&tx, result);
        })
    }
}

/// Hand a load result to the UI thread. Returns false when the receiver is
/// already gone, in which case the result is dropped.
pub fn post_result(tx: &Sender<BgMessage>, result: Result<Vec<Show>>) -> bool {
    let msg = match result {
        Ok(shows) => BgMessage::CatalogLoaded(shows),
        Err(e) => BgMessage::CatalogFailed(e),
    };
    if tx.send(msg).is_err() {
        debug!("catalog receiver closed before load finished");
        return false;
    }
    true
}
