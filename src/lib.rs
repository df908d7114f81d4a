//! quickcapture - a terminal quick-capture popup for markdown note vaults.
//!
//! Press a key, pick a mood, tag the thought, write it down and send it to a
//! new note, today's daily note or the inbox.

pub mod app;
pub mod capture;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod ui;
pub mod vault;
