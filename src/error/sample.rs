//! Host counter sampling errors.

use thiserror::Error;

/// A failed read of OS counters. The collector skips the tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    /// Total memory reported as zero, so a percentage cannot be computed.
    #[error("memory totals unavailable")]
    MemoryUnavailable,

    /// CPU usage was not a finite number.
    #[error("cpu usage unavailable: {message}")]
    CpuUnavailable { message: String },
}

impl SampleError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            SampleError::MemoryUnavailable => "E_SAMPLE_MEM",
            SampleError::CpuUnavailable { .. } => "E_SAMPLE_CPU",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SampleError::MemoryUnavailable.error_code(), "E_SAMPLE_MEM");
        let err = SampleError::CpuUnavailable {
            message: "non-finite usage NaN".to_string(),
        };
        assert_eq!(err.error_code(), "E_SAMPLE_CPU");
        assert_eq!(err.to_string(), "cpu usage unavailable: non-finite usage NaN");
    }
}
