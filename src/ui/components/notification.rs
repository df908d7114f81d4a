//! Toast notifications.
//!
//! Short-lived messages stacked in the bottom-right corner. Expiry is driven
//! by the app tick, which passes the current instant in so tests can control
//! time.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Most toasts kept at once; older ones are dropped first.
const MAX_VISIBLE: usize = 3;

/// Widest a toast gets, border included.
const MAX_WIDTH: u16 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Info => "ℹ",
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✗",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }

    /// How long a toast of this kind stays up.
    pub fn lifetime(self) -> Duration {
        match self {
            Self::Info | Self::Success => Duration::from_secs(3),
            Self::Warning | Self::Error => Duration::from_secs(5),
        }
    }
}

/// A single toast.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

impl Notification {
    /// Create a toast shown from `now` for the kind's lifetime.
    pub fn new(message: impl Into<String>, kind: NotificationKind, now: Instant) -> Self {
        Self {
            message: message.into(),
            kind,
            expires_at: now + kind.lifetime(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Rows needed to show the message at `inner_width` columns.
    fn height(&self, inner_width: u16) -> u16 {
        let text = self.message.width() + 2;
        let inner = usize::from(inner_width.max(1));
        u16::try_from((text + inner - 1) / inner).unwrap_or(u16::MAX).saturating_add(2)
    }
}

/// The stack of live toasts.
#[derive(Debug, Default)]
pub struct NotificationManager {
    notifications: VecDeque<Notification>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        tracing::debug!(kind = ?notification.kind, message = %notification.message, "Notification");
        self.notifications.push_back(notification);
        while self.notifications.len() > MAX_VISIBLE {
            self.notifications.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationKind::Info, Instant::now()));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationKind::Success, Instant::now()));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationKind::Warning, Instant::now()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationKind::Error, Instant::now()));
    }

    /// Drop toasts whose time is up.
    pub fn tick(&mut self, now: Instant) {
        self.notifications.retain(|n| !n.is_expired(now));
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Render the stack in the bottom-right corner of `area`, newest lowest.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let width = MAX_WIDTH.min(area.width.saturating_sub(2));
        if width < 6 {
            return;
        }
        let inner_width = width - 2;
        let x = area.right().saturating_sub(width + 1);
        let mut bottom = area.bottom().saturating_sub(1);

        for notification in self.notifications.iter().rev() {
            let height = notification.height(inner_width);
            if bottom < area.y + height {
                break;
            }
            let rect = Rect::new(x, bottom - height, width, height);
            render_notification(notification, frame, rect);
            bottom -= height;
        }
    }
}

fn render_notification(notification: &Notification, frame: &mut Frame, area: Rect) {
    let style = Style::default().fg(notification.kind.color());
    let text = Line::from(vec![
        Span::styled(format!("{} ", notification.kind.icon()), style.add_modifier(Modifier::BOLD)),
        Span::styled(notification.message.as_str(), style),
    ]);
    let block = Block::default().borders(Borders::ALL).border_style(style);

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: true }), area);
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    #[test]
    fn test_lifetimes_by_kind() {
        assert_eq!(NotificationKind::Success.lifetime(), Duration::from_secs(3));
        assert_eq!(NotificationKind::Error.lifetime(), Duration::from_secs(5));
    }

    #[test]
    fn test_expiry_follows_the_clock() {
        let now = Instant::now();
        let n = Notification::new("Saved", NotificationKind::Success, now);
        assert!(!n.is_expired(now + Duration::from_secs(2)));
        assert!(n.is_expired(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_tick_drops_only_expired() {
        let now = Instant::now();
        let mut manager = NotificationManager::new();
        manager.push(Notification::new("saved", NotificationKind::Success, now));
        manager.push(Notification::new("failed", NotificationKind::Error, now));

        manager.tick(now + Duration::from_secs(4));
        let left: Vec<&str> = manager.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(left, ["failed"]);

        manager.tick(now + Duration::from_secs(6));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_oldest_dropped_past_limit() {
        let mut manager = NotificationManager::new();
        for i in 0..5 {
            manager.info(format!("n{i}"));
        }
        assert_eq!(manager.len(), MAX_VISIBLE);
        assert_eq!(manager.iter().next().map(|n| n.message.as_str()), Some("n2"));
    }

    #[test]
    fn test_height_wraps_long_messages() {
        let n = Notification::new("x".repeat(30), NotificationKind::Info, Instant::now());
        assert_eq!(n.height(40), 3);
        assert_eq!(n.height(16), 4);
    }

    #[test]
    fn test_render_shows_message() {
        let mut manager = NotificationManager::new();
        manager.warning("Pick a mood first");
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal.draw(|frame| manager.render(frame, frame.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Pick a mood first"));
    }
}
