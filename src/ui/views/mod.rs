//! Screens.

mod capture;
mod home;

pub use capture::{CaptureAction, CaptureField, CaptureView};
pub use home::HomeView;
