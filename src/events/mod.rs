//! Event handling for the application.
//!
//! Terminal input is polled by [`EventHandler`] and turned into [`Event`]s
//! that the app consumes one at a time.

mod handler;
mod keys;

use crossterm::event::{KeyEvent, MouseEvent};

pub use handler::EventHandler;
pub use keys::{get_context_hints, is_quit, is_save, KeyContext};

/// An application event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// Mouse click, movement or scroll.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// The terminal window gained focus.
    FocusGained,
    /// The terminal window lost focus.
    FocusLost,
    /// The poll interval passed without input.
    Tick,
}
