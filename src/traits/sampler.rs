//! Host sampler trait abstraction.
//!
//! Separates reading OS counters from the collector loop so the loop can be
//! driven by scripted samples in tests.

use async_trait::async_trait;

use crate::error::SampleError;

/// Up/down state of a single network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceState {
    pub name: String,
    pub is_up: bool,
}

impl InterfaceState {
    pub fn new(name: impl Into<String>, is_up: bool) -> Self {
        Self {
            name: name.into(),
            is_up,
        }
    }
}

/// One reading of the host counters.
#[derive(Debug, Clone, PartialEq)]
pub struct HostSample {
    /// Global CPU usage over the sampling window, 0-100.
    pub cpu_percent: f64,
    /// Used memory as a percentage of total, 0-100.
    pub mem_percent: f64,
    /// Cumulative bytes sent across all interfaces since boot.
    pub bytes_sent: u64,
    /// Cumulative bytes received across all interfaces since boot.
    pub bytes_recv: u64,
    /// Per-interface link flags.
    pub interfaces: Vec<InterfaceState>,
}

/// Trait for reading host CPU, memory and network counters.
///
/// `sample` may block for the CPU sampling window (about one second in
/// production). Implementations must not reset the OS counters.
///
/// # Example
///
/// ```ignore
/// use netmon::traits::HostSampler;
///
/// async fn cpu<S: HostSampler>(sampler: &mut S) -> Result<f64, SampleError> {
///     Ok(sampler.sample().await?.cpu_percent)
/// }
/// ```
#[async_trait]
pub trait HostSampler: Send {
    /// Take one sample of the host counters.
    async fn sample(&mut self) -> Result<HostSample, SampleError>;
}
