//! Key contexts and the hint text shown for each.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Where keyboard input is currently going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    /// No modal open.
    Home,
    /// The mood or action selector.
    Selector,
    /// The tag query row.
    TagInput,
    /// A focused tag chip.
    TagChip,
    /// The note body.
    Note,
}

/// One-line hints for the help bar. Keys are in brackets.
pub fn get_context_hints(context: KeyContext) -> &'static str {
    match context {
        KeyContext::Home => "[n] new capture  [q] quit",
        KeyContext::Selector => "[←/→] choose  [Tab] next field  [Ctrl+S] save  [Esc] close",
        KeyContext::TagInput => {
            "[type] search  [↑/↓] pick  [Enter] add  [←] chips  [Bksp] remove last  [Tab] next"
        }
        KeyContext::TagChip => "[←/→/↑/↓] move  [Enter/Space] remove  [Esc] back to input",
        KeyContext::Note => "[type] write  [Tab] next field  [Ctrl+S] save  [Esc] close",
    }
}

/// Ctrl+C, which quits from anywhere.
pub fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Ctrl+S, which saves the open capture.
pub fn is_save(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('s' | 'S')) && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_context_has_hints() {
        for ctx in [
            KeyContext::Home,
            KeyContext::Selector,
            KeyContext::TagInput,
            KeyContext::TagChip,
            KeyContext::Note,
        ] {
            assert!(get_context_hints(ctx).starts_with('['));
        }
    }

    #[test]
    fn test_shortcuts() {
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(is_save(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(!is_save(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)));
    }
}
