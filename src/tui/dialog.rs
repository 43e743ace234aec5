use crate::show::Show;
use crossterm::event::{KeyCode, KeyEvent};

/// Events the details dialog reports back to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    Close,
}

/// Details view for the selected show.
///
/// Holds its own copy of the show and knows nothing about the search box;
/// the owner reacts to [`DialogEvent::Close`].
pub struct DetailsDialog {
    pub show: Show,
    pub scroll: u16,
}

impl DetailsDialog {
    pub fn new(show: Show) -> Self {
        Self { show, scroll: 0 }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<DialogEvent> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(DialogEvent::Close),
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            KeyCode::Home => {
                self.scroll = 0;
                None
            }
            _ => None,
        }
    }

    /// Label/value pairs shown above the description
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("ID", self.show.id.clone())];
        if let Some(seasons) = self.show.seasons {
            let label = if seasons == 1 { "season" } else { "seasons" };
            fields.push(("Seasons", format!("{} {}", seasons, label)));
        }
        if !self.show.genres.is_empty() {
            fields.push(("Genres", self.show.genre_names().join(", ")));
        }
        if let Some(updated) = self.show.updated_label() {
            fields.push(("Updated", updated));
        }
        if let Some(image) = &self.show.image {
            fields.push(("Image", image.clone()));
        }
        fields
    }
}
