//! Modal overlay host.
//!
//! [`ModalHost`] owns whatever is shown inside the modal and drives its
//! [`Lifecycle`]: content is mounted when opened and unmounted exactly once
//! when the modal closes or the host is dropped. The chrome carries a Save
//! button on its top border that only exists while content is mounted.

use ratatui::{
    layout::{Alignment, Position, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::theme;

/// Label of the Save button drawn on the modal border.
pub const SAVE_LABEL: &str = "[ Save ]";

/// Hooks called by [`ModalHost`] when content enters or leaves the screen.
pub trait Lifecycle {
    fn on_mount(&mut self) {}
    fn on_unmount(&mut self) {}
}

/// Create a centered rectangle of at most `width` x `height` inside `area`.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// A centered overlay that owns its content.
pub struct ModalHost<T: Lifecycle> {
    title: String,
    width: u16,
    height: u16,
    content: Option<T>,
    /// Where the Save button was last drawn.
    save_button: Option<Rect>,
}

impl<T: Lifecycle> ModalHost<T> {
    /// Create a closed modal with the given title and preferred size.
    pub fn new(title: impl Into<String>, width: u16, height: u16) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            content: None,
            save_button: None,
        }
    }

    /// Mount `content` and show it. Content already open is unmounted first.
    pub fn open(&mut self, mut content: T) {
        self.close();
        content.on_mount();
        debug!(title = %self.title, "Modal opened");
        self.content = Some(content);
    }

    /// Unmount and hand back the content, if any.
    pub fn close(&mut self) -> Option<T> {
        self.save_button = None;
        let mut content = self.content.take()?;
        content.on_unmount();
        debug!(title = %self.title, "Modal closed");
        Some(content)
    }

    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&T> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut T> {
        self.content.as_mut()
    }

    /// Whether `pos` is on the Save button.
    pub fn is_save_button(&self, pos: Position) -> bool {
        self.content.is_some() && self.save_button.is_some_and(|r| r.contains(pos))
    }

    /// Draw the chrome centered in `area`, then let `draw` fill the inside.
    ///
    /// Does nothing while closed.
    pub fn render_with<F>(&mut self, frame: &mut Frame, area: Rect, draw: F)
    where
        F: FnOnce(&mut T, &mut Frame, Rect),
    {
        let Some(content) = self.content.as_mut() else {
            self.save_button = None;
            return;
        };

        let t = theme();
        let dialog = centered_rect(area, self.width, self.height);
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let label_width = SAVE_LABEL.width() as u16;
        self.save_button = if dialog.width >= label_width + 4 {
            let rect = Rect::new(dialog.x + 2, dialog.y, label_width, 1);
            let style = Style::default()
                .fg(t.chip_fg)
                .bg(t.accent)
                .add_modifier(Modifier::BOLD);
            frame.render_widget(Paragraph::new(SAVE_LABEL).style(style), rect);
            Some(rect)
        } else {
            None
        };

        draw(content, frame, inner);
    }
}

impl<T: Lifecycle> Drop for ModalHost<T> {
    fn drop(&mut self) {
        self.close();
    }
}
