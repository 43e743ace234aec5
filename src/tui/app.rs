use crate::catalog::{BgMessage, CatalogLoader};
use crate::tui::dialog::{DetailsDialog, DialogEvent};
use crate::tui::search::SearchState;
use crate::tui::ui;
use crate::widget::SearchWidget;
use crate::AppConfig;
use crossbeam_channel::{unbounded, Receiver};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::prelude::*;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Screen regions recorded by the last draw, used for mouse hit-testing
#[derive(Debug, Default, Clone)]
pub struct LayoutRefs {
    /// Search bar plus the open dropdown
    pub root: Rect,
    /// Dropdown rows and the result row each one shows
    pub rows: Vec<(Rect, usize)>,
    /// Close button of the details dialog
    pub close_button: Option<Rect>,
}

pub struct App {
    pub widget: SearchWidget,
    pub search: SearchState,
    pub dialog: Option<DetailsDialog>,
    pub layout: LayoutRefs,
    pub endpoint: String,

    bg_receiver: Option<Receiver<BgMessage>>,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    /// Create the app and start loading the catalog
    pub fn new(config: &AppConfig) -> Self {
        let (tx, rx) = unbounded();
        CatalogLoader::spawn(config.endpoint.clone(), tx);
        info!(endpoint = %config.endpoint, "catalog load started");
        Self::with_receiver(config, rx)
    }

    /// Create the app around an existing loader channel
    pub fn with_receiver(config: &AppConfig, rx: Receiver<BgMessage>) -> Self {
        Self {
            widget: SearchWidget::new(config.debounce),
            search: SearchState::default(),
            dialog: None,
            layout: LayoutRefs::default(),
            endpoint: config.endpoint.clone(),
            bg_receiver: Some(rx),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> crate::Result<()> {
        let tick_rate = Duration::from_millis(50);

        loop {
            self.process_messages();
            self.widget.tick(Instant::now());

            terminal
                .draw(|frame| ui::draw(frame, self))
                .map_err(|e| crate::PodSearchError::Io(std::io::Error::other(e.to_string())))?;

            if self.should_quit {
                break;
            }

            let timeout = self
                .widget
                .time_until_lookup(Instant::now())
                .map_or(tick_rate, |d| d.min(tick_rate));

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key, Instant::now());
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }

        self.teardown();
        Ok(())
    }

    /// Drain loader messages
    pub fn process_messages(&mut self) {
        let rx = match &self.bg_receiver {
            Some(rx) => rx,
            None => return,
        };

        let mut done = false;
        while let Ok(msg) = rx.try_recv() {
            match msg {
                BgMessage::CatalogLoaded(shows) => self.widget.catalog_loaded(shows),
                BgMessage::CatalogFailed(err) => self.widget.catalog_failed(&err),
            }
            done = true;
        }

        // The loader sends exactly one message.
        if done {
            self.bg_receiver = None;
        }
    }

    /// Release the pending lookup and the loader channel
    pub fn teardown(&mut self) {
        self.widget.teardown();
        self.bg_receiver = None;
        debug!("app torn down");
    }

    fn open_selected(&mut self) {
        if let Some(show) = self.widget.selected() {
            self.dialog = Some(DetailsDialog::new(show.clone()));
        }
    }

    fn close_dialog(&mut self) {
        self.dialog = None;
        self.widget.close_details();
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        if let Some(dialog) = &mut self.dialog {
            if dialog.handle_key(key) == Some(DialogEvent::Close) {
                self.close_dialog();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if self.widget.is_visible() {
                    self.widget.dismiss();
                } else if !self.widget.query().is_empty() {
                    self.search.cursor_pos = 0;
                    self.widget.handle_input("", now);
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Down => self.widget.highlight_next(),
            KeyCode::Up => self.widget.highlight_prev(),
            KeyCode::Enter => {
                if self.widget.select_highlighted().is_some() {
                    self.open_selected();
                }
            }
            _ => {
                let query = self.widget.query().to_string();
                if let Some(value) = self.search.apply_key(&query, key) {
                    self.widget.handle_input(value, now);
                }
            }
        }
    }

    // --- Mouse handling ---

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let pos = Position::new(mouse.column, mouse.row);

        if self.dialog.is_some() {
            if self.layout.close_button.is_some_and(|r| r.contains(pos)) {
                self.close_dialog();
            }
            return;
        }

        if self.widget.is_visible() {
            let hit = self
                .layout
                .rows
                .iter()
                .find(|(rect, _)| rect.contains(pos))
                .map(|&(_, row)| row);
            if let Some(row) = hit {
                if self.widget.select(row).is_some() {
                    self.open_selected();
                }
                return;
            }
        }

        if !self.layout.root.contains(pos) {
            self.widget.dismiss();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Show;
    use crossbeam_channel::Sender;
    use crossterm::event::KeyModifiers;

    const DELAY: Duration = Duration::from_millis(100);

    fn app() -> (App, Sender<BgMessage>) {
        let (tx, rx) = unbounded();
        let config = AppConfig {
            debounce: DELAY,
            ..AppConfig::default()
        };
        (App::with_receiver(&config, rx), tx)
    }

    fn loaded_app() -> App {
        let (mut app, tx) = app();
        tx.send(BgMessage::CatalogLoaded(vec![
            Show::new("1", "The Daily"),
            Show::new("2", "Daily Wire"),
        ]))
        .unwrap();
        app.process_messages();
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn type_query(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)), now);
        }
    }

    #[test]
    fn test_typing_then_enter_opens_dialog() {
        let t0 = Instant::now();
        let mut app = loaded_app();
        type_query(&mut app, "Dail", t0);
        app.widget.tick(t0 + DELAY);
        assert!(app.widget.is_visible());

        app.handle_key(key(KeyCode::Enter), t0 + DELAY);
        assert!(app.dialog.is_some());
        assert!(!app.widget.is_visible());
        assert_eq!(app.widget.query(), "Dail");

        app.handle_key(key(KeyCode::Esc), t0 + DELAY);
        assert!(app.dialog.is_none());
        assert!(app.widget.selected().is_none());
    }

    #[test]
    fn test_escape_sequence() {
        let t0 = Instant::now();
        let mut app = loaded_app();
        type_query(&mut app, "Dail", t0);
        app.widget.tick(t0 + DELAY);

        app.handle_key(key(KeyCode::Esc), t0 + DELAY);
        assert!(!app.widget.is_visible());
        assert_eq!(app.widget.query(), "Dail");

        app.handle_key(key(KeyCode::Esc), t0 + DELAY);
        assert_eq!(app.widget.query(), "");
        assert!(!app.should_quit);

        app.handle_key(key(KeyCode::Esc), t0 + DELAY);
        assert!(app.should_quit);
    }

    #[test]
    fn test_click_outside_root_dismisses() {
        let t0 = Instant::now();
        let mut app = loaded_app();
        type_query(&mut app, "Dail", t0);
        app.widget.tick(t0 + DELAY);
        app.layout.root = Rect::new(0, 0, 40, 6);

        app.handle_mouse(click(10, 2));
        assert!(app.widget.is_visible());

        app.handle_mouse(click(50, 20));
        assert!(!app.widget.is_visible());
        assert_eq!(app.widget.query(), "Dail");
        assert_eq!(app.widget.results().len(), 2);
    }

    #[test]
    fn test_click_on_row_selects() {
        let t0 = Instant::now();
        let mut app = loaded_app();
        type_query(&mut app, "Dail", t0);
        app.widget.tick(t0 + DELAY);
        app.layout.root = Rect::new(0, 0, 40, 6);
        app.layout.rows = vec![(Rect::new(1, 3, 38, 1), 0), (Rect::new(1, 4, 38, 1), 1)];

        let expected = app.widget.results()[1].id.clone();
        app.handle_mouse(click(5, 4));
        assert_eq!(app.dialog.as_ref().map(|d| d.show.id.clone()), Some(expected));
        assert!(!app.widget.is_visible());
    }

    #[test]
    fn test_dialog_close_button() {
        let t0 = Instant::now();
        let mut app = loaded_app();
        type_query(&mut app, "Dail", t0);
        app.widget.tick(t0 + DELAY);
        app.handle_key(key(KeyCode::Enter), t0 + DELAY);
        app.layout.close_button = Some(Rect::new(30, 10, 9, 1));

        app.handle_mouse(click(0, 0));
        assert!(app.dialog.is_some());

        app.handle_mouse(click(32, 10));
        assert!(app.dialog.is_none());
        assert!(app.widget.selected().is_none());
    }

    #[test]
    fn test_failed_catalog() {
        let t0 = Instant::now();
        let (mut app, tx) = app();
        tx.send(BgMessage::CatalogFailed(crate::PodSearchError::Fetch { status: 500 }))
            .unwrap();
        app.process_messages();

        type_query(&mut app, "Dail", t0);
        app.widget.tick(t0 + DELAY);
        assert!(app.widget.results().is_empty());
        assert!(!app.widget.is_visible());
    }

    #[test]
    fn test_ctrl_c_quits_from_dialog() {
        let t0 = Instant::now();
        let mut app = loaded_app();
        type_query(&mut app, "Dail", t0);
        app.widget.tick(t0 + DELAY);
        app.handle_key(key(KeyCode::Enter), t0 + DELAY);

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), t0);
        assert!(app.should_quit);
    }
}
