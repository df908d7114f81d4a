//! Multi-line note editor.
//!
//! Holds the body of a capture as a list of lines with a line/column caret.
//! Columns count characters, not bytes, so non-ASCII notes edit correctly.
//! The view scrolls to keep the caret visible.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::theme;

/// A multi-line text editor.
#[derive(Debug, Clone)]
pub struct TextEditor {
    lines: Vec<String>,
    cursor_line: usize,
    /// Character index within the current line.
    cursor_col: usize,
    /// First visible line.
    scroll: usize,
    placeholder: String,
}

impl TextEditor {
    /// Create an editor holding `content`, caret at the start.
    pub fn new(content: &str) -> Self {
        let mut lines: Vec<String> = content.split('\n').map(String::from).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            cursor_line: 0,
            cursor_col: 0,
            scroll: 0,
            placeholder: String::new(),
        }
    }

    /// Create an empty editor.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Set the text shown while the editor is empty.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// The full text, lines joined with `\n`.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether the editor holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Whether the text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    /// Drop all text and reset the caret.
    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.scroll = 0;
    }

    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_chars(&self) -> usize {
        self.lines[self.cursor_line].chars().count()
    }

    /// Byte offset of character `col` in the current line.
    fn byte_at(&self, col: usize) -> usize {
        let line = &self.lines[self.cursor_line];
        line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
    }

    fn clamp_col(&mut self) {
        self.cursor_col = self.cursor_col.min(self.line_chars());
    }

    fn ensure_cursor_visible(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.cursor_line < self.scroll {
            self.scroll = self.cursor_line;
        }
        if self.cursor_line >= self.scroll + visible_height {
            self.scroll = self.cursor_line + 1 - visible_height;
        }
    }

    /// Handle a key press.
    ///
    /// Returns true if the text changed. Caret movement returns false.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                true
            }
            (KeyCode::Enter, KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_newline();
                true
            }
            (KeyCode::Backspace, _) => self.delete_backward(),
            (KeyCode::Delete, _) => self.delete_forward(),
            (KeyCode::Left, _) => {
                self.move_left();
                false
            }
            (KeyCode::Right, _) => {
                self.move_right();
                false
            }
            (KeyCode::Up, _) => {
                if self.cursor_line > 0 {
                    self.cursor_line -= 1;
                    self.clamp_col();
                }
                false
            }
            (KeyCode::Down, _) => {
                if self.cursor_line + 1 < self.lines.len() {
                    self.cursor_line += 1;
                    self.clamp_col();
                }
                false
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor_col = 0;
                false
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor_col = self.line_chars();
                false
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                if self.cursor_col == 0 {
                    return false;
                }
                let end = self.byte_at(self.cursor_col);
                self.lines[self.cursor_line].replace_range(..end, "");
                self.cursor_col = 0;
                true
            }
            (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                if self.cursor_col < self.line_chars() {
                    let start = self.byte_at(self.cursor_col);
                    self.lines[self.cursor_line].truncate(start);
                    true
                } else {
                    self.join_next()
                }
            }
            _ => false,
        }
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_at(self.cursor_col);
        self.lines[self.cursor_line].insert(at, c);
        self.cursor_col += 1;
    }

    fn insert_newline(&mut self) {
        let at = self.byte_at(self.cursor_col);
        let rest = self.lines[self.cursor_line].split_off(at);
        self.lines.insert(self.cursor_line + 1, rest);
        self.cursor_line += 1;
        self.cursor_col = 0;
    }

    fn delete_backward(&mut self) -> bool {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            let at = self.byte_at(self.cursor_col);
            self.lines[self.cursor_line].remove(at);
            true
        } else if self.cursor_line > 0 {
            let line = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.line_chars();
            self.lines[self.cursor_line].push_str(&line);
            true
        } else {
            false
        }
    }

    fn delete_forward(&mut self) -> bool {
        if self.cursor_col < self.line_chars() {
            let at = self.byte_at(self.cursor_col);
            self.lines[self.cursor_line].remove(at);
            true
        } else {
            self.join_next()
        }
    }

    /// Append the next line to the current one.
    fn join_next(&mut self) -> bool {
        if self.cursor_line + 1 >= self.lines.len() {
            return false;
        }
        let next = self.lines.remove(self.cursor_line + 1);
        self.lines[self.cursor_line].push_str(&next);
        true
    }

    fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.line_chars();
        }
    }

    fn move_right(&mut self) {
        if self.cursor_col < self.line_chars() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    /// Render the editor inside a bordered block titled `title`.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, title: &str) {
        let t = theme();
        let visible_height = area.height.saturating_sub(2) as usize;
        self.ensure_cursor_visible(visible_height);

        let (border, title_style) = if focused {
            (
                Style::default().fg(t.border_focused),
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            )
        } else {
            (Style::default().fg(t.border), Style::default().fg(t.fg))
        };
        let block = Block::default()
            .title(Span::styled(format!(" {} ", title), title_style))
            .borders(Borders::ALL)
            .border_style(border);

        let body: Vec<Line> = if self.is_empty() && !self.placeholder.is_empty() {
            vec![Line::from(Span::styled(
                self.placeholder.as_str(),
                Style::default().fg(t.input_placeholder),
            ))]
        } else {
            self.lines
                .iter()
                .skip(self.scroll)
                .take(visible_height)
                .map(|l| Line::from(Span::styled(l.as_str(), Style::default().fg(t.input_fg))))
                .collect()
        };
        frame.render_widget(Paragraph::new(body).block(block), area);

        if focused {
            let line = &self.lines[self.cursor_line];
            let before: String = line.chars().take(self.cursor_col).collect();
            let x = area.x + 1 + before.width() as u16;
            let y = area.y + 1 + (self.cursor_line - self.scroll) as u16;
            if x < area.right().saturating_sub(1) && y < area.bottom().saturating_sub(1) {
                frame.set_cursor_position(Position::new(x, y));
            }
        }
    }
}

impl Default for TextEditor {
    fn default() -> Self {
        Self::empty()
    }
}
