//! The capture form shown inside the modal.
//!
//! Four fields in Tab order: mood, tags, next action and the note body. The
//! view owns the [`TagInput`] and routes keys and clicks to it directly; the
//! tag set it reports through its commit callback is mirrored here so a save
//! always sees the latest selection.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info};

use crate::capture::{Action, Capture, Mood};
use crate::events::{is_save, KeyContext};
use crate::ui::components::{FocusLocus, Lifecycle, TagInput, TagSource, TextEditor};
use crate::ui::theme::theme;

/// Placeholder for the note body.
const NOTE_PLACEHOLDER: &str = "What's on your mind? Quickly jot down a new thought or idea...";

/// Tallest the tag field grows before its rows are clipped.
const MAX_TAG_FIELD_HEIGHT: u16 = 6;

/// Form fields, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureField {
    Mood,
    Tags,
    Action,
    Note,
}

impl CaptureField {
    const ORDER: [CaptureField; 4] = [
        CaptureField::Mood,
        CaptureField::Tags,
        CaptureField::Action,
        CaptureField::Note,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// What the form asks its owner to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureAction {
    /// Store this capture.
    Save(Capture),
    /// Close the modal.
    Close,
    /// A save was attempted but the form is incomplete.
    Invalid(String),
}

/// The capture form.
pub struct CaptureView {
    mood: Option<Mood>,
    /// Mood under the keyboard cursor.
    mood_cursor: usize,
    action: Action,
    /// Latest set reported by the tag input.
    tags: Rc<RefCell<Vec<String>>>,
    tag_input: TagInput,
    note: TextEditor,
    focus: CaptureField,
    /// Hit areas from the last render.
    mood_slots: Vec<(Mood, Rect)>,
    action_area: Option<Rect>,
    note_area: Option<Rect>,
}

impl CaptureView {
    /// Create a form offering tags from `source`.
    pub fn new(source: TagSource, default_action: Action, hide_delay: Duration) -> Self {
        let tags: Rc<RefCell<Vec<String>>> = Rc::default();
        let mirror = Rc::clone(&tags);
        let tag_input = TagInput::new(source, move |set: &[String]| {
            *mirror.borrow_mut() = set.to_vec();
        })
        .with_hide_delay(hide_delay);

        Self {
            mood: None,
            mood_cursor: 0,
            action: default_action,
            tags,
            tag_input,
            note: TextEditor::empty().with_placeholder(NOTE_PLACEHOLDER),
            focus: CaptureField::Mood,
            mood_slots: Vec::new(),
            action_area: None,
            note_area: None,
        }
    }

    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn note_text(&self) -> String {
        self.note.content()
    }

    /// Tags as last committed by the tag input.
    pub fn selected_tags(&self) -> Vec<String> {
        self.tags.borrow().clone()
    }

    pub fn focus(&self) -> CaptureField {
        self.focus
    }

    pub fn tag_input(&self) -> &TagInput {
        &self.tag_input
    }

    /// Move keyboard focus to `field`.
    ///
    /// Leaving the tag field blurs it, which lets its suggestion list linger
    /// for the hide delay.
    pub fn set_focus(&mut self, field: CaptureField, now: Instant) {
        if field == self.focus {
            return;
        }
        if self.focus == CaptureField::Tags {
            self.tag_input.blur(now);
        }
        if field == CaptureField::Tags {
            self.tag_input.focus();
        }
        debug!(from = ?self.focus, to = ?field, "Capture focus moved");
        self.focus = field;
    }

    /// Help bar context for the focused field.
    pub fn key_context(&self) -> KeyContext {
        match self.focus {
            CaptureField::Mood | CaptureField::Action => KeyContext::Selector,
            CaptureField::Tags => match self.tag_input.focus_locus() {
                FocusLocus::Input => KeyContext::TagInput,
                FocusLocus::Chip(_) => KeyContext::TagChip,
            },
            CaptureField::Note => KeyContext::Note,
        }
    }

    /// Advance timers.
    pub fn tick(&mut self, now: Instant) {
        self.tag_input.tick(now);
    }

    /// The terminal window lost focus.
    pub fn window_blurred(&mut self, now: Instant) {
        if self.focus == CaptureField::Tags {
            self.tag_input.blur(now);
        }
    }

    /// The terminal window got focus back.
    pub fn window_focused(&mut self) {
        if self.focus == CaptureField::Tags {
            self.tag_input.focus();
        }
    }

    /// Check the form and build a capture from it.
    ///
    /// Nothing is cleared here; call [`CaptureView::reset_after_save`] once
    /// the capture is stored.
    pub fn submit(&self) -> CaptureAction {
        let Some(mood) = self.mood else {
            return CaptureAction::Invalid("Pick a mood before saving.".to_string());
        };
        if self.note.is_blank() {
            return CaptureAction::Invalid("Write something before saving.".to_string());
        }
        let capture = Capture::new(self.note.content(), self.action, mood, self.selected_tags());
        info!(action = %capture.action, mood = %mood, tags = capture.tags.len(), "Capture submitted");
        CaptureAction::Save(capture)
    }

    /// Clear the note and mood after a successful save. Tags and the chosen
    /// action stay for the next capture.
    pub fn reset_after_save(&mut self) {
        self.note.clear();
        self.mood = None;
        self.mood_cursor = 0;
    }

    fn pick_mood(&mut self, index: usize) {
        if let Some(mood) = Mood::ALL.get(index) {
            self.mood_cursor = index;
            self.mood = Some(*mood);
            debug!(mood = %mood, "Mood picked");
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<CaptureAction> {
        if is_save(&key) {
            return Some(self.submit());
        }

        if self.focus == CaptureField::Tags && self.tag_input.handle_key(key) {
            return None;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Tab, KeyModifiers::NONE) => {
                self.set_focus(self.focus.next(), now);
                return None;
            }
            (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) => {
                self.set_focus(self.focus.prev(), now);
                return None;
            }
            (KeyCode::Esc, _) => return Some(CaptureAction::Close),
            _ => {}
        }

        match self.focus {
            CaptureField::Mood => self.handle_mood_key(key),
            CaptureField::Action => match key.code {
                KeyCode::Left => self.action = self.action.prev(),
                KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => {
                    self.action = self.action.next()
                }
                _ => {}
            },
            CaptureField::Note => {
                self.note.handle_input(key);
            }
            CaptureField::Tags => {}
        }
        None
    }

    fn handle_mood_key(&mut self, key: KeyEvent) {
        let last = Mood::ALL.len() - 1;
        match key.code {
            KeyCode::Left => self.mood_cursor = self.mood_cursor.saturating_sub(1),
            KeyCode::Right => self.mood_cursor = (self.mood_cursor + 1).min(last),
            KeyCode::Enter | KeyCode::Char(' ') => self.pick_mood(self.mood_cursor),
            KeyCode::Char(c @ '1'..='3') => self.pick_mood(usize::from(c as u8 - b'1')),
            _ => {}
        }
    }

    /// Handle a mouse event.
    ///
    /// The tag field (and its suggestion list, which may overlap the fields
    /// below it) gets first look at every event.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) -> Option<CaptureAction> {
        let pos = Position::new(mouse.column, mouse.row);

        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            self.tag_input.handle_mouse(mouse);
            return None;
        }

        if self.tag_input.contains(pos) {
            self.set_focus(CaptureField::Tags, now);
            self.tag_input.handle_mouse(mouse);
            return None;
        }

        if let Some(index) = self.mood_slots.iter().position(|(_, r)| r.contains(pos)) {
            self.set_focus(CaptureField::Mood, now);
            self.pick_mood(index);
        } else if self.action_area.is_some_and(|r| r.contains(pos)) {
            self.set_focus(CaptureField::Action, now);
            self.action = self.action.next();
        } else if self.note_area.is_some_and(|r| r.contains(pos)) {
            self.set_focus(CaptureField::Note, now);
        }
        None
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render the form into `area` (the inside of the modal).
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let tags_height = self
            .tag_input
            .preferred_height(area.width)
            .clamp(3, MAX_TAG_FIELD_HEIGHT);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(tags_height),
                Constraint::Length(3),
                Constraint::Min(3),
            ])
            .split(area);

        self.render_moods(frame, chunks[0]);
        self.tag_input
            .render(frame, chunks[1], self.focus == CaptureField::Tags);
        self.render_action(frame, chunks[2]);
        self.note
            .render(frame, chunks[3], self.focus == CaptureField::Note, "Note");
        self.note_area = Some(chunks[3]);

        // Drawn last so it sits on top of the fields below the tag input.
        self.tag_input.render_suggestions(frame, area);
    }

    fn field_block(&self, title: &'static str, focused: bool) -> Block<'static> {
        let t = theme();
        let (border, title_style) = if focused {
            (
                Style::default().fg(t.border_focused),
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            )
        } else {
            (Style::default().fg(t.border), Style::default().fg(t.fg))
        };
        Block::default()
            .title(Span::styled(title, title_style))
            .borders(Borders::ALL)
            .border_style(border)
    }

    fn render_moods(&mut self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let focused = self.focus == CaptureField::Mood;
        let block = self.field_block(" Mood ", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let slots = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(inner);

        self.mood_slots.clear();
        for (i, (mood, slot)) in Mood::ALL.iter().zip(slots.iter()).enumerate() {
            let mut style = Style::default().fg(t.fg);
            if self.mood == Some(*mood) {
                style = style.fg(t.chip_fg).bg(t.chip_bg).add_modifier(Modifier::BOLD);
            }
            if focused && i == self.mood_cursor {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            let label = format!("{} {}", mood.emoji(), mood.label());
            frame.render_widget(
                Paragraph::new(label).style(style).alignment(Alignment::Center),
                *slot,
            );
            self.mood_slots.push((*mood, *slot));
        }
    }

    fn render_action(&mut self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let focused = self.focus == CaptureField::Action;
        let block = self.field_block(" Next Action ", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let arrow = Style::default().fg(if focused { t.accent } else { t.muted });
        let line = Line::from(vec![
            Span::styled("◀ ", arrow),
            Span::styled(self.action.label(), Style::default().fg(t.fg).add_modifier(Modifier::BOLD)),
            Span::styled(" ▶", arrow),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
        self.action_area = Some(area);
    }
}

impl Lifecycle for CaptureView {
    fn on_mount(&mut self) {
        debug!("Capture form mounted");
    }

    fn on_unmount(&mut self) {
        self.tag_input.unmount();
        debug!(tags = self.tags.borrow().len(), "Capture form unmounted");
    }
}
