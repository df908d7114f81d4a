//! User interface components and views.
//!
//! This module contains all TUI rendering logic, including the capture form
//! and the reusable widgets it is built from.

pub mod components;
pub mod theme;
mod views;

pub use components::{
    render_context_help, FocusLocus, Lifecycle, ModalHost, Notification, NotificationKind,
    NotificationManager, TagInput, TagSource,
};
pub use theme::init_theme;
pub use views::{CaptureAction, CaptureField, CaptureView, HomeView};
