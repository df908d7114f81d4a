//! Keyboard and mouse handling for the tag input.
//!
//! Keys are dispatched by focus locus. The query row owns suggestion
//! navigation and text editing; a focused chip owns chip-to-chip movement and
//! removal. Up/Down on a chip move by on-screen position so wrapped rows can
//! be crossed the way they look rather than by index.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::trace;

use super::{FocusLocus, TagInput};

/// Vertical direction for spatial chip navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Up,
    Down,
}

fn center(rect: &Rect) -> (f64, f64) {
    (
        f64::from(rect.x) + f64::from(rect.width) / 2.0,
        f64::from(rect.y) + f64::from(rect.height) / 2.0,
    )
}

/// Find the chip nearest to `rects[current]` in direction `dir`.
///
/// Candidates must have their center strictly above the current chip's top
/// edge (Up) or strictly below its bottom edge (Down). Among those the one
/// with the smallest center-to-center distance wins; ties go to the lower
/// index.
pub fn spatial_neighbor(rects: &[Rect], current: usize, dir: Vertical) -> Option<usize> {
    let origin = rects.get(current)?;
    let (ox, oy) = center(origin);
    let top = f64::from(origin.top());
    let bottom = f64::from(origin.bottom());

    rects
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != current)
        .filter_map(|(i, rect)| {
            let (cx, cy) = center(rect);
            let in_direction = match dir {
                Vertical::Up => cy < top,
                Vertical::Down => cy > bottom,
            };
            in_direction.then(|| (i, (cx - ox).hypot(cy - oy)))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

impl TagInput {
    /// Handle a key press.
    ///
    /// Returns true if the key was consumed. Keys the widget does not bind
    /// (Tab from the query row, Esc with no open list, shortcuts) are left
    /// for the parent.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !self.mounted {
            return false;
        }
        trace!(key = ?key.code, locus = ?self.focus, "Tag input key");

        match self.focus {
            FocusLocus::Chip(index) if index < self.selected.len() => self.handle_chip_key(index, key),
            FocusLocus::Chip(_) => {
                self.focus = FocusLocus::Input;
                self.handle_query_key(key)
            }
            FocusLocus::Input => self.handle_query_key(key),
        }
    }

    fn handle_query_key(&mut self, key: KeyEvent) -> bool {
        let list_open = self.suggestions_visible && !self.suggestions.is_empty();

        match (key.code, key.modifiers) {
            (KeyCode::Down, _) if list_open => {
                self.highlight_next();
                true
            }
            (KeyCode::Up, _) if list_open => {
                self.highlight_prev();
                true
            }
            // Enter picks the highlighted suggestion even after Esc hid the list.
            (KeyCode::Enter, KeyModifiers::NONE) if self.highlighted_suggestion().is_some() => {
                match self.highlighted_suggestion().map(str::to_owned) {
                    Some(tag) => self.select_tag(&tag),
                    None => false,
                }
            }
            (KeyCode::Esc, _) if list_open => {
                self.hide_suggestions();
                true
            }
            (KeyCode::Backspace, _) if self.query.is_empty() => {
                if !list_open {
                    self.remove_last();
                }
                true
            }
            (KeyCode::Left, KeyModifiers::NONE)
                if self.query.is_empty() && self.query.cursor() == 0 && !self.selected.is_empty() =>
            {
                self.focus = FocusLocus::Chip(self.selected.len() - 1);
                true
            }
            (KeyCode::Char(_), KeyModifiers::NONE | KeyModifiers::SHIFT)
            | (KeyCode::Char('a' | 'e' | 'u' | 'w'), KeyModifiers::CONTROL)
            | (
                KeyCode::Backspace
                | KeyCode::Delete
                | KeyCode::Left
                | KeyCode::Right
                | KeyCode::Home
                | KeyCode::End,
                _,
            ) => {
                if self.query.handle_input(key) {
                    self.refilter(true);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_chip_key(&mut self, index: usize, key: KeyEvent) -> bool {
        let last = self.selected.len() - 1;

        match (key.code, key.modifiers) {
            (KeyCode::Left, _) => {
                if index > 0 {
                    self.focus = FocusLocus::Chip(index - 1);
                }
                true
            }
            (KeyCode::Right, _) => {
                self.focus = if index < last {
                    FocusLocus::Chip(index + 1)
                } else {
                    FocusLocus::Input
                };
                true
            }
            (KeyCode::Up, _) => {
                self.move_spatial(index, Vertical::Up);
                true
            }
            (KeyCode::Down, _) => {
                self.move_spatial(index, Vertical::Down);
                true
            }
            (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => {
                let tag = self.selected[index].clone();
                self.remove_tag(&tag);
                self.focus = FocusLocus::Input;
                true
            }
            // Shift+Tab leaves the widget: clear the locus and let the parent
            // move focus backwards.
            (KeyCode::BackTab, _) => {
                self.focus = FocusLocus::Input;
                false
            }
            (KeyCode::Tab, modifiers) if modifiers.contains(KeyModifiers::SHIFT) => {
                self.focus = FocusLocus::Input;
                false
            }
            (KeyCode::Tab, _) | (KeyCode::Esc, _) => {
                self.focus = FocusLocus::Input;
                true
            }
            _ => false,
        }
    }

    /// Move chip focus to the spatial neighbour of `index`, if there is one.
    fn move_spatial(&mut self, index: usize, dir: Vertical) {
        // A layout from before the last change cannot be trusted.
        if self.layout.chips.len() != self.selected.len() {
            return;
        }
        let Some(area) = self.area else {
            return;
        };
        // Rows clipped off the bottom of the field are not reachable.
        let (indices, rects): (Vec<usize>, Vec<Rect>) = self
            .layout
            .rects()
            .into_iter()
            .enumerate()
            .filter(|(i, rect)| *i == index || rect.intersects(area))
            .unzip();
        let Some(current) = indices.iter().position(|&i| i == index) else {
            return;
        };
        if let Some(target) = spatial_neighbor(&rects, current, dir).map(|t| indices[t]) {
            trace!(from = index, to = target, ?dir, "Spatial chip move");
            self.focus = FocusLocus::Chip(target);
        }
    }

    /// Index of the suggestion row under `pos`.
    fn suggestion_at(&self, pos: Position) -> Option<usize> {
        if !self.shows_suggestions() {
            return None;
        }
        let area = self.suggestion_area?;
        if !area.contains(pos) {
            return None;
        }
        let index = self.suggestion_offset + usize::from(pos.y - area.y);
        (index < self.suggestions.len()).then_some(index)
    }

    /// Handle a mouse event.
    ///
    /// Clicking a chip removes it, clicking a suggestion selects it, and
    /// hovering a suggestion highlights it. Returns true if the event landed
    /// on the widget.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if !self.mounted {
            return false;
        }
        let pos = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = self.suggestion_at(pos) {
                    let tag = self.suggestions[index].clone();
                    self.select_tag(&tag);
                    return true;
                }
                if let Some(index) = self.layout.chip_at(pos) {
                    // Focus on another chip follows its tag.
                    let tag = self.layout.chips[index].0.clone();
                    self.remove_tag(&tag);
                    return true;
                }
                if self.anchor.is_some_and(|anchor| anchor.contains(pos)) {
                    self.focus = FocusLocus::Input;
                    return true;
                }
                false
            }
            MouseEventKind::Moved => match self.suggestion_at(pos) {
                Some(index) => {
                    self.set_highlight(index);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Whether `pos` falls on the field or its open suggestion list.
    pub fn contains(&self, pos: Position) -> bool {
        self.anchor.is_some_and(|anchor| anchor.contains(pos)) || self.suggestion_at(pos).is_some()
    }
}
