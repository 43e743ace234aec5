//! Search widget state
//!
//! Front-end independent model of the search box: the typed query, the
//! debounced lookup, the dropdown of results and the selected show. The
//! terminal host feeds it input, clicks and loader messages, and reads the
//! state back when drawing.

use crate::debounce::Debouncer;
use crate::error::PodSearchError;
use crate::index::{IndexOptions, SearchIndex};
use crate::show::Show;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Catalog availability as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready { shows: usize },
    Failed { message: String, status: Option<u16> },
}

/// Dropdown visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dropdown {
    #[default]
    Hidden,
    Shown,
}

/// One row of the result set, pointing into the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRow {
    pub position: usize,
    pub score: Option<u32>,
}

pub struct SearchWidget {
    query: String,
    // Set once, never replaced.
    index: Option<SearchIndex>,
    load_state: LoadState,
    results: Vec<ResultRow>,
    dropdown: Dropdown,
    highlighted: Option<usize>,
    selected: Option<usize>,
    debouncer: Debouncer,
}

impl SearchWidget {
    pub fn new(debounce_delay: Duration) -> Self {
        Self {
            query: String::new(),
            index: None,
            load_state: LoadState::Loading,
            results: Vec::new(),
            dropdown: Dropdown::Hidden,
            highlighted: None,
            selected: None,
            debouncer: Debouncer::new(debounce_delay),
        }
    }

    // --- Catalog ---

    /// Build the index from a freshly loaded catalog. Only the first call
    /// has any effect.
    pub fn catalog_loaded(&mut self, shows: Vec<Show>) {
        if self.index.is_some() {
            warn!("catalog already indexed, ignoring reload");
            return;
        }
        let count = shows.len();
        self.index = Some(SearchIndex::new(shows, IndexOptions::default()));
        self.load_state = LoadState::Ready { shows: count };
        info!(shows = count, "search index built");
    }

    /// Record a failed load. The index stays absent.
    pub fn catalog_failed(&mut self, err: &PodSearchError) {
        if self.index.is_some() {
            return;
        }
        self.load_state = LoadState::Failed {
            message: err.summary(),
            status: err.status(),
        };
        warn!(error = %err, "search disabled, catalog not available");
    }

    // --- Input ---

    /// A new value for the text field.
    ///
    /// The query updates immediately. A blank value clears and hides the
    /// results right away; anything else schedules a lookup.
    pub fn handle_input(&mut self, value: impl Into<String>, now: Instant) {
        self.query = value.into();

        if self.query.trim().is_empty() {
            if let Some(id) = self.debouncer.cancel() {
                debug!(timer = id.0, "cancelled pending lookup for blank query");
            }
            self.results.clear();
            self.highlighted = None;
            self.dropdown = Dropdown::Hidden;
            return;
        }

        let id = self.debouncer.schedule(self.query.clone(), now);
        debug!(timer = id.0, query = %self.query, "lookup scheduled");
    }

    /// Run the lookup if its delay has elapsed. Returns true when one ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(query) => {
                self.lookup(&query);
                true
            }
            None => false,
        }
    }

    /// Time until the pending lookup is due, if one is pending
    pub fn time_until_lookup(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_ready(now)
    }

    /// Recompute the result set for `query`.
    ///
    /// Without an index this leaves the results empty and the dropdown
    /// hidden.
    pub fn lookup(&mut self, query: &str) {
        if query.trim().is_empty() {
            self.results.clear();
            self.highlighted = None;
            self.dropdown = Dropdown::Hidden;
            return;
        }

        let Some(index) = &self.index else {
            debug!(query, "lookup skipped, index not available");
            self.results.clear();
            self.highlighted = None;
            return;
        };

        self.results = index
            .search(query)
            .into_iter()
            .map(|hit| ResultRow {
                position: hit.position,
                score: hit.score,
            })
            .collect();
        self.highlighted = if self.results.is_empty() { None } else { Some(0) };
        self.dropdown = Dropdown::Shown;
        debug!(query, hits = self.results.len(), "lookup complete");
    }

    // --- Dropdown ---

    /// Pick the result at `row`: it becomes the selected show and the
    /// dropdown closes. The query is left alone.
    pub fn select(&mut self, row: usize) -> Option<&Show> {
        let position = self.results.get(row)?.position;
        if let Some(id) = self.debouncer.cancel() {
            debug!(timer = id.0, "pending lookup cancelled by selection");
        }
        self.selected = Some(position);
        self.dropdown = Dropdown::Hidden;
        let show = self.index.as_ref()?.get(position)?;
        info!(id = %show.id, title = %show.title, "show selected");
        Some(show)
    }

    pub fn select_highlighted(&mut self) -> Option<&Show> {
        if !self.is_visible() {
            return None;
        }
        let row = self.highlighted?;
        self.select(row)
    }

    pub fn highlight_next(&mut self) {
        if !self.is_visible() || self.results.is_empty() {
            return;
        }
        let last = self.results.len() - 1;
        self.highlighted = Some(match self.highlighted {
            Some(i) => (i + 1).min(last),
            None => 0,
        });
    }

    pub fn highlight_prev(&mut self) {
        if !self.is_visible() || self.results.is_empty() {
            return;
        }
        self.highlighted = Some(self.highlighted.map_or(0, |i| i.saturating_sub(1)));
    }

    /// Click outside the widget: hide the dropdown, keep everything else.
    pub fn dismiss(&mut self) {
        self.dropdown = Dropdown::Hidden;
    }

    /// The details view was closed.
    pub fn close_details(&mut self) {
        self.selected = None;
    }

    /// Release the pending timer before the widget goes away.
    pub fn teardown(&mut self) {
        if let Some(id) = self.debouncer.cancel() {
            debug!(timer = id.0, "pending lookup cancelled on teardown");
        }
    }

    // --- Accessors ---

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn index(&self) -> Option<&SearchIndex> {
        self.index.as_ref()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn dropdown(&self) -> Dropdown {
        self.dropdown
    }

    pub fn is_visible(&self) -> bool {
        self.dropdown == Dropdown::Shown
    }

    pub fn result_rows(&self) -> &[ResultRow] {
        &self.results
    }

    /// Shows in the result set, best match first
    pub fn results(&self) -> Vec<&Show> {
        match &self.index {
            Some(index) => self
                .results
                .iter()
                .filter_map(|r| index.get(r.position))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn selected(&self) -> Option<&Show> {
        let position = self.selected?;
        self.index.as_ref()?.get(position)
    }

    pub fn has_pending_lookup(&self) -> bool {
        self.debouncer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(100);

    fn ready_widget() -> SearchWidget {
        let mut w = SearchWidget::new(DELAY);
        w.catalog_loaded(vec![
            Show::new("1", "The Daily"),
            Show::new("2", "Daily Wire"),
            Show::new("3", "Hardcore History"),
        ]);
        w
    }

    #[test]
    fn test_initial_state() {
        let w = SearchWidget::new(DELAY);
        assert_eq!(w.load_state(), &LoadState::Loading);
        assert_eq!(w.dropdown(), Dropdown::Hidden);
        assert!(w.results().is_empty());
        assert!(w.selected().is_none());
        assert!(w.index().is_none());
    }

    #[test]
    fn test_query_updates_before_lookup() {
        let t0 = Instant::now();
        let mut w = ready_widget();
        w.handle_input("Hard", t0);
        assert_eq!(w.query(), "Hard");
        assert!(!w.is_visible());
        assert!(w.has_pending_lookup());

        assert!(w.tick(t0 + DELAY));
        assert!(w.is_visible());
        assert_eq!(w.results()[0].title, "Hardcore History");
        assert_eq!(w.highlighted(), Some(0));
    }

    #[test]
    fn test_dropdown_opens_with_no_matches() {
        let t0 = Instant::now();
        let mut w = ready_widget();
        w.handle_input("qqqq", t0);
        w.tick(t0 + DELAY);
        assert!(w.is_visible());
        assert!(w.results().is_empty());
        assert_eq!(w.highlighted(), None);
    }

    #[test]
    fn test_second_catalog_ignored() {
        let mut w = ready_widget();
        w.catalog_loaded(vec![Show::new("9", "Other")]);
        assert_eq!(w.index().map(|i| i.len()), Some(3));
        assert_eq!(w.load_state(), &LoadState::Ready { shows: 3 });
    }

    #[test]
    fn test_failure_after_success_ignored() {
        let mut w = ready_widget();
        w.catalog_failed(&PodSearchError::Fetch { status: 503 });
        assert_eq!(w.load_state(), &LoadState::Ready { shows: 3 });
    }

    #[test]
    fn test_highlight_navigation() {
        let t0 = Instant::now();
        let mut w = ready_widget();
        w.handle_input("Dail", t0);
        w.tick(t0 + DELAY);
        assert_eq!(w.results().len(), 2);

        w.highlight_prev();
        assert_eq!(w.highlighted(), Some(0));
        w.highlight_next();
        w.highlight_next();
        assert_eq!(w.highlighted(), Some(1));

        let expected = w.results()[1].id.clone();
        let picked = w.select_highlighted().map(|s| s.id.clone());
        assert_eq!(picked, Some(expected));
        assert!(!w.is_visible());
    }

    #[test]
    fn test_select_out_of_range() {
        let t0 = Instant::now();
        let mut w = ready_widget();
        w.handle_input("Dail", t0);
        w.tick(t0 + DELAY);
        assert!(w.select(7).is_none());
        assert!(w.is_visible());
        assert!(w.selected().is_none());
    }

    #[test]
    fn test_select_highlighted_requires_open_dropdown() {
        let t0 = Instant::now();
        let mut w = ready_widget();
        w.handle_input("Dail", t0);
        w.tick(t0 + DELAY);
        w.dismiss();
        assert!(w.select_highlighted().is_none());
        assert!(w.selected().is_none());
    }

    #[test]
    fn test_close_details_keeps_query() {
        let t0 = Instant::now();
        let mut w = ready_widget();
        w.handle_input("Dail", t0);
        w.tick(t0 + DELAY);
        w.select(0);
        w.close_details();
        assert!(w.selected().is_none());
        assert_eq!(w.query(), "Dail");
        assert!(!w.is_visible());
    }

    #[test]
    fn test_teardown_cancels_pending() {
        let t0 = Instant::now();
        let mut w = ready_widget();
        w.handle_input("Dail", t0);
        w.teardown();
        assert!(!w.tick(t0 + DELAY));
        assert!(!w.is_visible());
    }
}
