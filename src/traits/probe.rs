//! Speed probe trait abstraction.

use async_trait::async_trait;

use crate::error::ProbeError;

/// Result of one successful speed probe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeedSample {
    /// Download throughput in Mbps.
    pub download_mbps: f64,
    /// Upload throughput in Mbps.
    pub upload_mbps: f64,
    /// Round-trip latency in milliseconds.
    pub latency_ms: f64,
}

/// Trait for network speed probes.
///
/// Implementations measure download and upload throughput plus latency.
/// They may take several seconds; the collector bounds each call with a
/// timeout and treats expiry as [`ProbeError::Timeout`].
#[async_trait]
pub trait SpeedProbe: Send + Sync {
    /// Run one full measurement.
    async fn measure(&self) -> Result<SpeedSample, ProbeError>;
}
