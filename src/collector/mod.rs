//! Background metrics collection.
//!
//! A [`Collector`] owns the host sampler and speed probe for one run. Calling
//! [`Collector::start`] spawns the sampling loop on a tokio task and returns a
//! [`CollectorHandle`] used to stop it and collect its result.
//!
//! # Dependency Injection
//!
//! - Use [`Collector::from_config`] in production (sysinfo + HTTP probe)
//! - Use [`Collector::new`] in tests with the scripted adapters
//!
//! # Example
//!
//! ```ignore
//! let handle = Collector::from_config(CollectorConfig::load(None)?).start();
//! let stop = handle.stop_handle();
//! ctrlc::set_handler(move || stop.stop())?;
//! let ticks = handle.join().await?;
//! ```

pub mod tick;

pub use tick::{ProbeSchedule, TickRunner};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::adapters::{DisabledProbe, HttpSpeedProbe, SysinfoSampler};
use crate::config::CollectorConfig;
use crate::error::{NetmonResult, PersistenceError};
use crate::store::MetricStore;
use crate::traits::{HostSampler, SpeedProbe};

/// Cloneable trigger for the stop signal of one run.
///
/// Safe to move into signal handlers. Raising it more than once is harmless.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Receiver side, for loops that wait on this signal.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Raise the stop signal. Never blocks.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// A running collector.
pub struct CollectorHandle {
    stop: StopHandle,
    task: JoinHandle<Result<u64, PersistenceError>>,
}

impl CollectorHandle {
    /// Ask the loop to finish. Returns immediately.
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// True once the loop has exited, for any reason.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the loop to exit.
    ///
    /// Returns the number of rows written, or the store error that ended the
    /// run. No rows are appended after this returns.
    pub async fn join(self) -> NetmonResult<u64> {
        Ok(self.task.await??)
    }
}

/// Periodic sampler that appends one record per tick to the metrics store.
pub struct Collector {
    config: CollectorConfig,
    sampler: Box<dyn HostSampler>,
    probe: Arc<dyn SpeedProbe>,
}

impl Collector {
    pub fn new(
        config: CollectorConfig,
        sampler: Box<dyn HostSampler>,
        probe: Arc<dyn SpeedProbe>,
    ) -> Self {
        Self {
            config,
            sampler,
            probe,
        }
    }

    /// Build a collector on the production sampler and probe.
    pub fn from_config(config: CollectorConfig) -> Self {
        let sampler = Box::new(SysinfoSampler::new(config.cpu_window));
        let probe: Arc<dyn SpeedProbe> = if config.probe.enabled {
            Arc::new(HttpSpeedProbe::new(config.probe.clone()))
        } else {
            Arc::new(DisabledProbe)
        };
        Self::new(config, sampler, probe)
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Spawn the sampling loop with a fresh stop signal.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> CollectorHandle {
        let stop = StopHandle::new();
        let stop_rx = stop.subscribe();

        let runner = TickRunner::new(
            self.sampler,
            self.probe,
            ProbeSchedule::new(self.config.probe_interval_secs),
            self.config.probe_timeout,
            self.config.health_threshold_bytes,
        );
        let store = MetricStore::new(&self.config.store_path);
        let tick_period = self.config.tick_period;

        tracing::info!(
            store = %store.path().display(),
            tick_ms = tick_period.as_millis() as u64,
            probe_interval_secs = self.config.probe_interval_secs,
            "collector started"
        );

        let task = tokio::spawn(run_loop(runner, store, tick_period, stop_rx));
        CollectorHandle { stop, task }
    }
}

async fn run_loop(
    mut runner: TickRunner,
    store: MetricStore,
    tick_period: Duration,
    mut stop_rx: watch::Receiver<bool>,
) -> Result<u64, PersistenceError> {
    let started = Instant::now();
    let mut written: u64 = 0;

    loop {
        if *stop_rx.borrow() {
            break;
        }

        let tick_start = Instant::now();
        match runner.run_tick(tick_start - started).await {
            Ok(record) => {
                if let Err(e) = store.append(&record) {
                    tracing::error!(code = e.error_code(), "metrics store write failed: {}", e);
                    return Err(e);
                }
                written += 1;
                tracing::debug!(
                    timestamp = %record.timestamp,
                    cpu = record.cpu_percent,
                    mem = record.mem_percent,
                    link = %record.link_status,
                    "tick recorded"
                );
            }
            Err(e) => {
                tracing::warn!(code = e.error_code(), "skipping tick: {}", e);
            }
        }

        let pause = tick_period.saturating_sub(tick_start.elapsed());
        tokio::select! {
            _ = tokio::time::sleep(pause) => {}
            _ = stop_requested(&mut stop_rx) => break,
        }
    }

    tracing::info!(ticks = written, "collector stopped");
    Ok(written)
}

/// Resolves once the stop signal is raised or every stop handle is gone.
async fn stop_requested(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|stopped| *stopped).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ScriptedProbe, ScriptedSampler};

    #[test]
    fn test_stop_handle_is_shared() {
        let stop = StopHandle::new();
        let rx = stop.subscribe();
        let clone = stop.clone();
        assert!(!stop.is_stopped());

        clone.stop();
        assert!(stop.is_stopped());
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn test_stop_before_first_sleep_ends_quickly() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CollectorConfig::default()
            .with_store_path(dir.path().join("m.csv"))
            .with_tick_period(Duration::from_secs(60));
        let sampler = ScriptedSampler::new(ScriptedSampler::host(1, 1, &[true]));
        let collector = Collector::new(config, Box::new(sampler), Arc::new(ScriptedProbe::new()));

        let handle = collector.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.stop();

        let ticks = tokio::time::timeout(Duration::from_secs(2), handle.join())
            .await
            .expect("join should not wait for the full tick period")
            .unwrap();
        assert_eq!(ticks, 1);
    }
}
