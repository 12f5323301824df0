//! Host sampler backed by `sysinfo`.
//!
//! Reads global CPU usage over a blocking window, memory usage, cumulative
//! network counters and per-interface link state.

use async_trait::async_trait;
use std::time::Duration;
use sysinfo::{Networks, System};

use crate::error::SampleError;
use crate::system::link::interface_is_up;
use crate::traits::{HostSample, HostSampler, InterfaceState};

/// Samples CPU, memory and network counters with `sysinfo`.
///
/// Holds the `System` and `Networks` handles across ticks so the interface
/// list and CPU baselines are not rebuilt every sample.
pub struct SysinfoSampler {
    system: System,
    networks: Networks,
    cpu_window: Duration,
}

impl SysinfoSampler {
    /// Create a sampler that measures CPU usage over `cpu_window`.
    ///
    /// The window is raised to `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL` if it
    /// is shorter, since shorter windows report meaningless values.
    pub fn new(cpu_window: Duration) -> Self {
        Self {
            system: System::new(),
            networks: Networks::new_with_refreshed_list(),
            cpu_window: cpu_window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    pub fn cpu_window(&self) -> Duration {
        self.cpu_window
    }

    async fn sample_cpu(&mut self) -> Result<f64, SampleError> {
        self.system.refresh_cpu_usage();
        tokio::time::sleep(self.cpu_window).await;
        self.system.refresh_cpu_usage();

        let usage = f64::from(self.system.global_cpu_usage());
        if !usage.is_finite() {
            return Err(SampleError::CpuUnavailable {
                message: format!("non-finite usage {}", usage),
            });
        }
        Ok(usage.clamp(0.0, 100.0))
    }

    fn sample_memory(&mut self) -> Result<f64, SampleError> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(SampleError::MemoryUnavailable);
        }
        Ok(self.system.used_memory() as f64 / total as f64 * 100.0)
    }

    fn sample_network(&mut self) -> (u64, u64, Vec<InterfaceState>) {
        // Drop interfaces that disappeared since the last tick.
        self.networks.refresh(true);

        let mut sent: u64 = 0;
        let mut recv: u64 = 0;
        let mut interfaces = Vec::with_capacity(self.networks.list().len());

        for (name, data) in self.networks.list() {
            sent = sent.saturating_add(data.total_transmitted());
            recv = recv.saturating_add(data.total_received());
            let has_addresses = !data.ip_networks().is_empty();
            interfaces.push(InterfaceState::new(name.clone(), interface_is_up(name, has_addresses)));
        }

        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        (sent, recv, interfaces)
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl HostSampler for SysinfoSampler {
    async fn sample(&mut self) -> Result<HostSample, SampleError> {
        let cpu_percent = self.sample_cpu().await?;
        let mem_percent = self.sample_memory()?;
        let (bytes_sent, bytes_recv, interfaces) = self.sample_network();

        Ok(HostSample {
            cpu_percent,
            mem_percent,
            bytes_sent,
            bytes_recv,
            interfaces,
        })
    }
}
