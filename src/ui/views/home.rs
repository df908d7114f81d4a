//! The screen behind the capture modal.

use std::collections::VecDeque;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// How many recent saves are listed.
const MAX_RECENT: usize = 5;

/// Welcome text and the destinations of the last few saves.
#[derive(Debug, Default)]
pub struct HomeView {
    /// Newest first.
    recent: VecDeque<String>,
    vault_name: String,
}

impl HomeView {
    pub fn new(vault_name: impl Into<String>) -> Self {
        Self {
            recent: VecDeque::new(),
            vault_name: vault_name.into(),
        }
    }

    /// Remember where a capture was stored.
    pub fn record(&mut self, destination: impl Into<String>) {
        self.recent.push_front(destination.into());
        self.recent.truncate(MAX_RECENT);
    }

    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let t = crate::ui::theme::theme();
        let mut lines = vec![
            Line::raw(""),
            Line::styled(
                "Quick Capture",
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ),
            Line::styled(format!("Vault: {}", self.vault_name), Style::default().fg(t.muted)),
            Line::raw(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(t.fg)),
                Span::styled("n", Style::default().fg(t.accent).add_modifier(Modifier::BOLD)),
                Span::styled(" to capture a thought.", Style::default().fg(t.fg)),
            ]),
        ];

        if !self.recent.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::styled("Recently saved", Style::default().fg(t.muted)));
            lines.extend(
                self.recent
                    .iter()
                    .map(|dest| Line::styled(dest.clone(), Style::default().fg(t.fg))),
            );
        }

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }
}
