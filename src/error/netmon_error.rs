//! Unified error type for netmon.
//!
//! `NetmonError` wraps the domain errors so callers outside the collector
//! (the CLI, embedding applications) can handle them uniformly.

use std::fmt;

use super::category::ErrorCategory;
use super::config::ConfigError;
use super::persistence::PersistenceError;
use super::probe::ProbeError;
use super::sample::SampleError;

#[derive(Debug)]
pub enum NetmonError {
    /// Speed probe failure.
    Probe(ProbeError),

    /// OS counter read failure.
    Sample(SampleError),

    /// Metrics store failure.
    Persistence(PersistenceError),

    /// Configuration failure.
    Config(ConfigError),

    /// The collector task panicked or was aborted.
    TaskFailed { message: String },
}

impl NetmonError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            NetmonError::Probe(_) => ErrorCategory::Network,
            NetmonError::Sample(_) => ErrorCategory::Sampling,
            NetmonError::Persistence(_) => ErrorCategory::Storage,
            NetmonError::Config(_) => ErrorCategory::Configuration,
            NetmonError::TaskFailed { .. } => ErrorCategory::Internal,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetmonError::Persistence(err) => err.user_message(),
            NetmonError::TaskFailed { message } => {
                format!("The collector stopped unexpectedly: {}", message)
            }
            other => format!("{}: {}", other.category().description(), other),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetmonError::Probe(err) => err.error_code(),
            NetmonError::Sample(err) => err.error_code(),
            NetmonError::Persistence(err) => err.error_code(),
            NetmonError::Config(err) => err.error_code(),
            NetmonError::TaskFailed { .. } => "E_TASK",
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for NetmonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetmonError::Probe(err) => write!(f, "{}", err),
            NetmonError::Sample(err) => write!(f, "{}", err),
            NetmonError::Persistence(err) => write!(f, "{}", err),
            NetmonError::Config(err) => write!(f, "{}", err),
            NetmonError::TaskFailed { message } => write!(f, "collector task failed: {}", message),
        }
    }
}

impl std::error::Error for NetmonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetmonError::Probe(err) => Some(err),
            NetmonError::Sample(err) => Some(err),
            NetmonError::Persistence(err) => Some(err),
            NetmonError::Config(err) => Some(err),
            NetmonError::TaskFailed { .. } => None,
        }
    }
}

impl From<ProbeError> for NetmonError {
    fn from(err: ProbeError) -> Self {
        NetmonError::Probe(err)
    }
}

impl From<SampleError> for NetmonError {
    fn from(err: SampleError) -> Self {
        NetmonError::Sample(err)
    }
}

impl From<PersistenceError> for NetmonError {
    fn from(err: PersistenceError) -> Self {
        NetmonError::Persistence(err)
    }
}

impl From<ConfigError> for NetmonError {
    fn from(err: ConfigError) -> Self {
        NetmonError::Config(err)
    }
}

impl From<tokio::task::JoinError> for NetmonError {
    fn from(err: tokio::task::JoinError) -> Self {
        NetmonError::TaskFailed {
            message: err.to_string(),
        }
    }
}
