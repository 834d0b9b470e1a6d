//! Error types for configuration loading and bundle construction.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("bunder settings required: pass inline settings or an app settings path")]
    MissingSettings,

    #[error("missing required setting '{0}'")]
    MissingSetting(&'static str),

    // Bundle record errors
    #[error("bundle record #{index} is null")]
    MissingBundle { index: usize },

    #[error("bundle record has no Name")]
    MissingName,

    #[error("bundle '{bundle}' must have at least one file under Files")]
    NoFiles { bundle: String },

    #[error(
        "extension not determined on bundle '{bundle}': provide OutputFileName or at least one file in Files with an extension"
    )]
    ExtensionNotDetermined { bundle: String },

    #[error("bundle name '{name}' is defined more than once")]
    DuplicateBundle { name: String },

    // Parsing errors
    #[error("invalid config value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl ToString) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.to_string(),
        }
    }
}
