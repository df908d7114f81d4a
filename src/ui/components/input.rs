//! Single-line query field.
//!
//! Used for the search row of the tag input. Supports caret movement and the
//! Emacs bindings Ctrl+A/E/U/W. The caret counts characters rather than bytes,
//! so multi-byte tags such as `café` edit correctly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::theme;

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    text: String,
    /// In characters.
    caret: usize,
    /// Shown dimmed while `text` is empty.
    placeholder: String,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// Replace the text, leaving the caret after the last character.
    pub fn set_value(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.caret = self.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.caret = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Caret position in characters.
    pub fn cursor(&self) -> usize {
        self.caret
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_at(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(i, _)| i)
    }

    /// Remove the character at `chars`, if there is one.
    fn remove_at(&mut self, chars: usize) -> bool {
        if chars >= self.len() {
            return false;
        }
        let at = self.byte_at(chars);
        self.text.remove(at);
        true
    }

    /// Delete the word ending at the caret along with any separators after it.
    fn delete_word_back(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        let end = self.byte_at(self.caret);
        let head = self.text[..end].trim_end_matches(|c: char| !c.is_alphanumeric());
        let start = head
            .char_indices()
            .rev()
            .find(|(_, c)| !c.is_alphanumeric())
            .map_or(0, |(i, c)| i + c.len_utf8());
        self.text.replace_range(start..end, "");
        self.caret = self.text[..start].chars().count();
        true
    }

    /// Apply a key. Returns true if the text changed; caret-only moves return
    /// false.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.byte_at(self.caret);
                self.text.insert(at, c);
                self.caret += 1;
                true
            }
            (KeyCode::Backspace, _) if self.caret > 0 => {
                self.caret -= 1;
                self.remove_at(self.caret)
            }
            (KeyCode::Delete, _) => self.remove_at(self.caret),
            (KeyCode::Left, KeyModifiers::NONE) => {
                self.caret = self.caret.saturating_sub(1);
                false
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                self.caret = (self.caret + 1).min(self.len());
                false
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.caret = 0;
                false
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.caret = self.len();
                false
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let changed = !self.text.is_empty();
                self.clear();
                changed
            }
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => self.delete_word_back(),
            _ => false,
        }
    }

    /// Draw the text (or placeholder) on one borderless row. When `focused`,
    /// the terminal cursor goes to the caret if it fits.
    pub fn render_inline(&self, frame: &mut Frame, area: Rect, focused: bool) {
        if area.is_empty() {
            return;
        }
        let t = theme();

        let paragraph = if self.text.is_empty() {
            Paragraph::new(self.placeholder.as_str()).style(Style::default().fg(t.input_placeholder))
        } else {
            Paragraph::new(self.text.as_str()).style(Style::default().fg(t.input_fg))
        };
        frame.render_widget(paragraph, area);

        if focused {
            let before: String = self.text.chars().take(self.caret).collect();
            let x = area.x.saturating_add(before.width() as u16);
            if x < area.right() {
                frame.set_cursor_position(Position::new(x, area.y));
            }
        }
    }
}
