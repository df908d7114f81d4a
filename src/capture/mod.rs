//! Capture model: what the modal produces and where it goes.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// How the user feels about the captured thought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    Sunny,
    Cloudy,
    Rainy,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Sunny, Mood::Cloudy, Mood::Rainy];

    /// Stable identifier written into the vault.
    pub fn id(self) -> &'static str {
        match self {
            Mood::Sunny => "sunny",
            Mood::Cloudy => "cloudy",
            Mood::Rainy => "rainy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Sunny => "Sunny",
            Mood::Cloudy => "Cloudy",
            Mood::Rainy => "Rainy",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Sunny => "☀️",
            Mood::Cloudy => "☁️",
            Mood::Rainy => "🌧️",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Where a capture is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// A new note of its own.
    #[default]
    CreateNote,
    /// Appended to today's daily note.
    AddDaily,
    /// Appended to the inbox file.
    AddInbox,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::CreateNote, Action::AddDaily, Action::AddInbox];

    pub fn id(self) -> &'static str {
        match self {
            Action::CreateNote => "create-note",
            Action::AddDaily => "add-daily",
            Action::AddInbox => "add-inbox",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::CreateNote => "Create Note",
            Action::AddDaily => "Add to Daily Note",
            Action::AddInbox => "Add to Inbox",
        }
    }

    /// The next action, wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// The previous action, wrapping around.
    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| format!("unknown action '{}' (expected create-note, add-daily or add-inbox)", s))
    }
}

/// A finished capture, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub text: String,
    pub action: Action,
    pub mood: Mood,
    pub tags: Vec<String>,
    pub captured_at: NaiveDateTime,
}

impl Capture {
    /// A capture stamped with the current local time.
    pub fn new(text: impl Into<String>, action: Action, mood: Mood, tags: Vec<String>) -> Self {
        Self {
            text: text.into(),
            action,
            mood,
            tags,
            captured_at: Local::now().naive_local(),
        }
    }

    /// First non-blank line of the text, trimmed.
    pub fn headline(&self) -> Option<&str> {
        self.text.lines().map(str::trim).find(|l| !l.is_empty())
    }
}

/// Somewhere captures can be stored.
pub trait CaptureSink {
    type Error: std::error::Error;

    /// Store `capture`, returning a short description of where it went.
    fn store(&mut self, capture: &Capture) -> Result<String, Self::Error>;
}
