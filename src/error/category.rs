//! Error category classification for unified error handling.
//!
//! Categories decide how the collector reacts to a failure: absorb it,
//! skip the tick, or stop collecting.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Speed probe failures (connection, DNS, timeout, bad status).
    /// Absorbed by the collector and recorded as zeroed values.
    Network,

    /// OS counter reads that failed for one tick.
    /// The tick is skipped and the loop continues.
    Sampling,

    /// Filesystem errors on the metrics store.
    /// Fatal to the collection loop.
    Storage,

    /// Invalid configuration file or environment value.
    Configuration,

    /// The collector task itself panicked or was aborted.
    Internal,
}

impl ErrorCategory {
    /// Returns true if the collector keeps running after an error of this
    /// category.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Sampling)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Sampling => "sampling",
            ErrorCategory::Storage => "storage",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Internal => "internal",
        }
    }

    /// Returns a user-friendly description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Network speed probe failed",
            ErrorCategory::Sampling => "Could not read system counters",
            ErrorCategory::Storage => "Metrics store error",
            ErrorCategory::Configuration => "Configuration problem",
            ErrorCategory::Internal => "Collector failure",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => {
                "Check your internet connection or disable the speed probe"
            }
            ErrorCategory::Sampling => {
                "The next tick will retry automatically"
            }
            ErrorCategory::Storage => {
                "Check file permissions and available disk space for the store path"
            }
            ErrorCategory::Configuration => {
                "Check your configuration file and NETMON_* environment variables"
            }
            ErrorCategory::Internal => {
                "Restart the collector with RUST_LOG=netmon=debug for details"
            }
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_recoverable() {
        assert!(ErrorCategory::Network.is_recoverable());
        assert!(ErrorCategory::Sampling.is_recoverable());
        assert!(!ErrorCategory::Storage.is_recoverable());
        assert!(!ErrorCategory::Configuration.is_recoverable());
        assert!(!ErrorCategory::Internal.is_recoverable());
    }

    #[test]
    fn test_category_as_str() {
        assert_eq!(ErrorCategory::Network.as_str(), "network");
        assert_eq!(ErrorCategory::Sampling.as_str(), "sampling");
        assert_eq!(ErrorCategory::Storage.as_str(), "storage");
        assert_eq!(ErrorCategory::Configuration.as_str(), "configuration");
        assert_eq!(ErrorCategory::Internal.as_str(), "internal");
    }

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", ErrorCategory::Storage), "storage");
    }

    #[test]
    fn test_category_recovery_hint() {
        assert!(ErrorCategory::Storage.recovery_hint().contains("disk space"));
        assert!(ErrorCategory::Configuration.recovery_hint().contains("NETMON_"));
    }
}
