//! Configuration loading errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("environment variable {variable}: {message}")]
    Environment { variable: String, message: String },

    #[error("invalid setting {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "E_CFG_READ",
            ConfigError::Parse { .. } => "E_CFG_PARSE",
            ConfigError::Environment { .. } => "E_CFG_ENV",
            ConfigError::Invalid { .. } => "E_CFG_INVALID",
        }
    }
}
