//! Speed probe error types.
//!
//! Every variant here is absorbed by the collector: the tick records zeros
//! for download, upload and latency, and the next probe runs at the next
//! interval boundary.

use thiserror::Error;

/// Failure of a single network speed probe.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbeError {
    /// The probe could not fetch its configuration / reach the test server.
    #[error("speed test configuration retrieval failed for {url}: {message}")]
    ConfigRetrieval { url: String, message: String },

    /// Connection to the test server failed mid-measurement.
    #[error("connection to {url} failed: {message}")]
    ConnectionFailed { url: String, message: String },

    /// The test server answered with a non-success status.
    #[error("speed test server returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The transfer completed but moved no bytes.
    #[error("{direction} transfer moved no data")]
    EmptyTransfer { direction: &'static str },

    /// The probe did not finish within its time budget.
    #[error("speed test timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    /// The probe is turned off in configuration.
    #[error("speed test disabled")]
    Disabled,

    /// Any other failure.
    #[error("speed test failed: {message}")]
    Other { message: String },
}

impl ProbeError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ProbeError::ConfigRetrieval { .. } => "E_PROBE_CONFIG",
            ProbeError::ConnectionFailed { .. } => "E_PROBE_CONNECT",
            ProbeError::HttpStatus { .. } => "E_PROBE_STATUS",
            ProbeError::EmptyTransfer { .. } => "E_PROBE_EMPTY",
            ProbeError::Timeout { .. } => "E_PROBE_TIMEOUT",
            ProbeError::Disabled => "E_PROBE_DISABLED",
            ProbeError::Other { .. } => "E_PROBE_OTHER",
        }
    }
}

/// Classify a reqwest error raised while talking to `url`.
pub fn classify_reqwest_error(err: &reqwest::Error, url: &str) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout { after_secs: 0 }
    } else if err.is_connect() {
        ProbeError::ConnectionFailed {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else if let Some(status) = err.status() {
        ProbeError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        }
    } else {
        ProbeError::Other {
            message: err.to_string(),
        }
    }
}
