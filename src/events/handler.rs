//! Event handler implementation.
//!
//! Polls crossterm for terminal events and converts them to application
//! events.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};

use super::Event;

/// Poll interval used when none is configured.
const TICK_RATE_MS: u64 = 50;

/// Polls the terminal for input.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a handler with the default tick rate.
    pub fn new() -> Self {
        Self::with_tick_rate(TICK_RATE_MS)
    }

    /// Create a handler with a custom tick rate.
    pub fn with_tick_rate(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Block until the next event or until the tick rate elapses.
    ///
    /// Returns `Event::Tick` when nothing arrived in time.
    pub fn next(&self) -> std::io::Result<Event> {
        if event::poll(self.tick_rate)? {
            Ok(convert(event::read()?))
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a crossterm event onto an app event.
///
/// Key releases and repeats (reported on some platforms) become ticks so a
/// key is only ever handled once. Pastes are not supported.
fn convert(event: CrosstermEvent) -> Event {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
        CrosstermEvent::Key(_) => Event::Tick,
        CrosstermEvent::Mouse(mouse) => Event::Mouse(mouse),
        CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
        CrosstermEvent::FocusGained => Event::FocusGained,
        CrosstermEvent::FocusLost => Event::FocusLost,
        CrosstermEvent::Paste(_) => Event::Tick,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{
        KeyCode, KeyEvent, KeyEventState, KeyModifiers, MouseEvent, MouseEventKind,
    };

    use super::*;

    #[test]
    fn test_tick_rates() {
        assert_eq!(EventHandler::new().tick_rate, Duration::from_millis(TICK_RATE_MS));
        assert_eq!(EventHandler::with_tick_rate(20).tick_rate, Duration::from_millis(20));
        assert_eq!(EventHandler::default().tick_rate, Duration::from_millis(TICK_RATE_MS));
    }

    #[test]
    fn test_only_presses_become_keys() {
        let press = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(convert(CrosstermEvent::Key(press)), Event::Key(press));

        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(convert(CrosstermEvent::Key(release)), Event::Tick);
    }

    #[test]
    fn test_mouse_and_focus_pass_through() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(convert(CrosstermEvent::Mouse(mouse)), Event::Mouse(mouse));
        assert_eq!(convert(CrosstermEvent::FocusLost), Event::FocusLost);
        assert_eq!(convert(CrosstermEvent::Resize(80, 24)), Event::Resize(80, 24));
    }
}
