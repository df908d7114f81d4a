//! Application settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::capture::Action;

/// Behaviour of the capture modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The UI theme to use (`dark` or `light`).
    pub theme: String,
    /// Destination preselected when the modal opens.
    pub default_action: Action,
    /// Candidate tags always offered, in this order.
    pub tags: Vec<String>,
    /// Also offer every `#tag` found in the vault.
    pub scan_vault_tags: bool,
    /// How long the suggestion list lingers after the tag field loses focus.
    pub blur_hide_delay_ms: u64,
    /// Event loop poll interval.
    pub tick_rate_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            default_action: Action::CreateNote,
            tags: Vec::new(),
            scan_vault_tags: true,
            blur_hide_delay_ms: 150,
            tick_rate_ms: 50,
        }
    }
}

/// Where in the vault captures are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// The vault folder.
    pub root: PathBuf,
    /// Inbox note, relative to the root.
    pub inbox_file: PathBuf,
    /// Folder of daily notes, relative to the root. Empty means the root.
    pub daily_folder: PathBuf,
    /// Folder for new notes, relative to the root. Empty means the root.
    pub notes_folder: PathBuf,
}

impl VaultConfig {
    /// Default layout rooted at `root`.
    pub fn at(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            inbox_file: PathBuf::from("Inbox.md"),
            daily_folder: PathBuf::new(),
            notes_folder: PathBuf::new(),
        }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        let root = dirs::home_dir()
            .map(|home| home.join("notes"))
            .unwrap_or_else(|| PathBuf::from("notes"));
        Self::at(root)
    }
}
