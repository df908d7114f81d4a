//! Configuration management for quickcapture.
//!
//! Settings live in a TOML file under the platform config directory
//! (`~/.config/quickcapture/config.toml` on Linux). A missing file means
//! defaults. `QUICKCAPTURE_CONFIG` points at a different file.

mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::capture::Action;

pub use settings::{Settings, VaultConfig};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "QUICKCAPTURE_CONFIG";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    #[error("failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    #[error("failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to write configuration file: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("invalid configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("{0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub settings: Settings,
    pub vault: VaultConfig,
}

impl Config {
    /// Where the config file is read from.
    ///
    /// `QUICKCAPTURE_CONFIG` wins over the platform default.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("quickcapture").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(ConfigError::WriteError)?;
        debug!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Check values that parse but make no sense.
    pub fn validate(&self) -> Result<()> {
        let s = &self.settings;
        if !(10..=1000).contains(&s.tick_rate_ms) {
            return Err(ConfigError::ValidationError(format!(
                "tick_rate_ms must be between 10 and 1000, got {}",
                s.tick_rate_ms
            )));
        }
        if s.blur_hide_delay_ms > 5000 {
            return Err(ConfigError::ValidationError(format!(
                "blur_hide_delay_ms must be at most 5000, got {}",
                s.blur_hide_delay_ms
            )));
        }

        let v = &self.vault;
        if v.inbox_file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError("vault.inbox_file cannot be empty".to_string()));
        }
        for (name, path) in [
            ("inbox_file", &v.inbox_file),
            ("daily_folder", &v.daily_folder),
            ("notes_folder", &v.notes_folder),
        ] {
            if path.is_absolute() {
                return Err(ConfigError::ValidationError(format!(
                    "vault.{} must be relative to the vault root, got '{}'",
                    name,
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the file.
    ///
    /// Extra tags are added after the configured ones.
    pub fn with_overrides(
        mut self,
        vault: Option<PathBuf>,
        tags: Vec<String>,
        action: Option<Action>,
    ) -> Self {
        if let Some(root) = vault {
            self.vault.root = root;
        }
        self.settings.tags.extend(tags);
        if let Some(action) = action {
            self.settings.default_action = action;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.settings.blur_hide_delay_ms, 150);
        assert_eq!(config.settings.default_action, Action::CreateNote);
        assert_eq!(config.vault.inbox_file, PathBuf::from("Inbox.md"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.settings.tags = vec!["Rust".to_string(), "Ideas".to_string()];
        config.settings.default_action = Action::AddInbox;
        config.vault = VaultConfig::at(dir.path());
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[settings]\ndefault_action = \"add-daily\"\ntags = [\"a\"]\n\n[vault]\nroot = \"/tmp/v\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.default_action, Action::AddDaily);
        assert_eq!(config.settings.tags, ["a"]);
        assert_eq!(config.settings.tick_rate_ms, 50);
        assert_eq!(config.vault.root, PathBuf::from("/tmp/v"));
        assert_eq!(config.vault.inbox_file, PathBuf::from("Inbox.md"));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[settings]\ndefault_action = \"archive\"\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.settings.tick_rate_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = Config::default();
        config.settings.blur_hide_delay_ms = 10_000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.vault.inbox_file = PathBuf::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.vault.daily_folder = std::env::temp_dir();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("daily_folder"));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.settings.tags = vec!["a".to_string()];
        let config = config.with_overrides(
            Some(PathBuf::from("/vault")),
            vec!["b".to_string()],
            Some(Action::AddDaily),
        );
        assert_eq!(config.vault.root, PathBuf::from("/vault"));
        assert_eq!(config.settings.tags, ["a", "b"]);
        assert_eq!(config.settings.default_action, Action::AddDaily);
    }

    #[test]
    #[serial]
    fn test_env_overrides_config_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::env::set_var(CONFIG_ENV, &path);
        let resolved = Config::config_path();
        std::env::remove_var(CONFIG_ENV);
        assert_eq!(resolved.unwrap(), path);
    }
}
