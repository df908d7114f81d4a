//! Contextual help bar.
//!
//! A single line of key hints at the bottom of the screen.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::events::{get_context_hints, KeyContext};
use crate::ui::theme::theme;

/// Render the hints for `context` into `area`.
pub fn render_context_help(frame: &mut Frame, area: Rect, context: KeyContext) {
    let spans = parse_hints_to_spans(get_context_hints(context));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Split hint text into spans, styling bracketed keys apart from their
/// descriptions.
fn parse_hints_to_spans(hints: &str) -> Vec<Span<'static>> {
    let t = theme();
    let key_style = Style::default().fg(t.accent);
    let text_style = Style::default().fg(t.muted);

    let mut spans = Vec::new();
    let mut current = String::new();
    for c in hints.chars() {
        match c {
            '[' => {
                if !current.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut current), text_style));
                }
                current.push(c);
            }
            ']' if current.starts_with('[') => {
                current.push(c);
                spans.push(Span::styled(std::mem::take(&mut current), key_style));
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        spans.push(Span::styled(current, text_style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_and_text_alternate() {
        let spans = parse_hints_to_spans("[n] new  [q] quit");
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, ["[n]", " new  ", "[q]", " quit"]);
        assert_eq!(spans[0].style.fg, Some(theme().accent));
    }

    #[test]
    fn test_plain_and_empty() {
        assert_eq!(parse_hints_to_spans("just text").len(), 1);
        assert!(parse_hints_to_spans("").is_empty());
    }

    #[test]
    fn test_unclosed_bracket_is_text() {
        let spans = parse_hints_to_spans("a ] b");
        assert_eq!(spans.len(), 1);
    }
}
