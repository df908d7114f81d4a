//! Application-level errors.
//!
//! Each layer has its own `thiserror` enum; [`AppError`] gathers them and
//! turns them into short messages for the notification area.

use thiserror::Error;

use crate::config::ConfigError;
use crate::vault::VaultError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Vault(#[from] VaultError),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl AppError {
    /// Wrap a failure to set up or restore the terminal.
    pub fn terminal(err: std::io::Error) -> Self {
        AppError::Terminal(err.to_string())
    }

    /// A message fit for a toast: no paths to internals, no error chains.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find the configuration directory.".to_string()
                }
                ConfigError::CreateDirError(_) | ConfigError::WriteError(_) => {
                    "Could not save configuration. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => "Could not read the configuration file.".to_string(),
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Vault(e) => match e {
                VaultError::MissingRoot(path) => {
                    format!("Vault folder '{}' does not exist.", path.display())
                }
                VaultError::EmptyCapture => "Nothing to save: write something first.".to_string(),
                VaultError::Write { path, .. } => {
                    format!("Could not write '{}'. Your note is still here.", path.display())
                }
                VaultError::NameExhausted(stem) => {
                    format!("Too many notes named '{}'. Change the first line.", stem)
                }
            },
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
        }
    }

    /// Whether the app cannot sensibly continue.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Config(_) | AppError::Vault(VaultError::MissingRoot(_)) | AppError::Terminal(_)
        )
    }

    /// A hint on how to fix the problem, if there is an obvious one.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ParseError(_) | ConfigError::ValidationError(_)) => {
                Some("Fix the config file or delete it to start from defaults.")
            }
            AppError::Vault(VaultError::MissingRoot(_)) => {
                Some("Create the folder or pass --vault <path>.")
            }
            AppError::Vault(VaultError::Write { .. }) => {
                Some("Check the vault folder permissions and press Ctrl+S again.")
            }
            _ => None,
        }
    }
}
