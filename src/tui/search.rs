use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// Text field state for the search box. The text itself is owned by the
/// widget; this only tracks the caret.
#[derive(Default)]
pub struct SearchState {
    /// Byte offset of the caret in the query
    pub cursor_pos: usize,
}

impl SearchState {
    /// Apply an editing key to `query`. Returns the new text when it changed.
    pub fn apply_key(&mut self, query: &str, key: KeyEvent) -> Option<String> {
        // Keep the caret valid if the query changed underneath us.
        if self.cursor_pos > query.len() || !query.is_char_boundary(self.cursor_pos) {
            self.cursor_pos = query.len();
        }

        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut text = query.to_string();
                text.insert(self.cursor_pos, c);
                self.cursor_pos += c.len_utf8();
                Some(text)
            }
            KeyCode::Backspace => {
                if self.cursor_pos == 0 {
                    return None;
                }
                let prev = prev_boundary(query, self.cursor_pos);
                let mut text = query.to_string();
                text.remove(prev);
                self.cursor_pos = prev;
                Some(text)
            }
            KeyCode::Delete => {
                if self.cursor_pos >= query.len() {
                    return None;
                }
                let mut text = query.to_string();
                text.remove(self.cursor_pos);
                Some(text)
            }
            KeyCode::Left => {
                self.cursor_pos = prev_boundary(query, self.cursor_pos);
                None
            }
            KeyCode::Right => {
                if self.cursor_pos < query.len() {
                    self.cursor_pos = query[self.cursor_pos..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor_pos + i)
                        .unwrap_or(query.len());
                }
                None
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
                None
            }
            KeyCode::End => {
                self.cursor_pos = query.len();
                None
            }
            _ => None,
        }
    }

    /// Caret column in terminal cells
    pub fn cursor_column(&self, query: &str) -> u16 {
        let end = self.cursor_pos.min(query.len());
        query.get(..end).map_or(0, |s| s.width() as u16)
    }
}

fn prev_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0)
}
