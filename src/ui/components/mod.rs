//! Reusable UI components.

mod fuzzy;
mod help_bar;
mod input;
mod modal;
mod notification;
pub mod tag_input;
mod text_editor;

pub use fuzzy::fuzzy_match;
pub use help_bar::render_context_help;
pub use input::TextInput;
pub use modal::{centered_rect, Lifecycle, ModalHost, SAVE_LABEL};
pub use notification::{Notification, NotificationKind, NotificationManager};
pub use tag_input::{FocusLocus, TagInput, TagSource};
pub use text_editor::TextEditor;
