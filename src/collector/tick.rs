//! One collector tick: probe when scheduled, sample the host, build a record.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;

use crate::error::{ProbeError, SampleError};
use crate::record::{round2, HealthStatus, LinkStatus, MetricRecord, TIMESTAMP_FORMAT};
use crate::traits::{HostSampler, SpeedProbe, SpeedSample};

/// Decides which ticks run the speed probe.
///
/// A tick probes when its whole elapsed seconds are an exact multiple of the
/// interval. Ticks that land past a boundary do not catch up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSchedule {
    interval_secs: u64,
}

impl ProbeSchedule {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval_secs: interval_secs.max(1),
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn should_probe(&self, elapsed: Duration) -> bool {
        elapsed.as_secs() % self.interval_secs == 0
    }
}

/// Per-run tick state: the injected sampler and probe plus the probe values
/// carried between boundaries.
pub struct TickRunner {
    sampler: Box<dyn HostSampler>,
    probe: Arc<dyn SpeedProbe>,
    schedule: ProbeSchedule,
    probe_timeout: Duration,
    health_threshold_bytes: u64,
    carried: SpeedSample,
}

impl TickRunner {
    pub fn new(
        sampler: Box<dyn HostSampler>,
        probe: Arc<dyn SpeedProbe>,
        schedule: ProbeSchedule,
        probe_timeout: Duration,
        health_threshold_bytes: u64,
    ) -> Self {
        Self {
            sampler,
            probe,
            schedule,
            probe_timeout,
            health_threshold_bytes,
            carried: SpeedSample::default(),
        }
    }

    /// Probe values that the next record will carry.
    pub fn carried(&self) -> SpeedSample {
        self.carried
    }

    /// Run one tick `elapsed` after the loop started.
    ///
    /// Probe failures are absorbed here. A sampling failure is returned and
    /// no record is produced.
    pub async fn run_tick(&mut self, elapsed: Duration) -> Result<MetricRecord, SampleError> {
        if self.schedule.should_probe(elapsed) {
            self.carried = match run_probe(Arc::clone(&self.probe), self.probe_timeout).await {
                Ok(sample) => SpeedSample {
                    download_mbps: round2(sample.download_mbps),
                    upload_mbps: round2(sample.upload_mbps),
                    latency_ms: round2(sample.latency_ms),
                },
                Err(ProbeError::Disabled) => SpeedSample::default(),
                Err(e) => {
                    tracing::warn!(code = e.error_code(), "Speedtest error: {}", e);
                    SpeedSample::default()
                }
            };
        }

        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let host = self.sampler.sample().await?;

        let traffic_volume = host.bytes_sent.saturating_add(host.bytes_recv);
        let speed = self.carried;

        Ok(MetricRecord {
            timestamp,
            cpu_percent: round2(host.cpu_percent),
            mem_percent: round2(host.mem_percent),
            download_speed: speed.download_mbps,
            upload_speed: speed.upload_mbps,
            bandwidth_total: round2(speed.download_mbps + speed.upload_mbps),
            latency: speed.latency_ms,
            link_status: LinkStatus::from_interfaces(host.interfaces.iter().map(|i| i.is_up)),
            health_status: HealthStatus::from_traffic(traffic_volume, self.health_threshold_bytes),
            bytes_sent: host.bytes_sent,
            bytes_recv: host.bytes_recv,
            traffic_volume,
        })
    }

}

/// Run the probe under `timeout`. Takes an owned handle: the runner itself
/// is `Send` but not `Sync`.
async fn run_probe(
    probe: Arc<dyn SpeedProbe>,
    timeout: Duration,
) -> Result<SpeedSample, ProbeError> {
    match tokio::time::timeout(timeout, probe.measure()).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout {
            after_secs: timeout.as_secs(),
        }),
    }
}
