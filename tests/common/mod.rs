//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! mod common;
//! use common::{fast_config, read_lines};
//!
//! let dir = tempfile::TempDir::new().unwrap();
//! let config = fast_config(&dir);
//! ```
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use netmon::config::CollectorConfig;
use netmon::record::{HealthStatus, LinkStatus, MetricRecord};
use tempfile::TempDir;

/// Store path inside a test directory.
pub fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("system_metrics.csv")
}

/// Collector config with a short tick for fast tests.
///
/// Ticks every 50ms. Runs shorter than one second keep whole elapsed
/// seconds at 0, so every tick lands on a probe boundary.
pub fn fast_config(dir: &TempDir) -> CollectorConfig {
    CollectorConfig::default()
        .with_store_path(store_path(dir))
        .with_tick_period(Duration::from_millis(50))
        .with_probe_timeout(Duration::from_millis(200))
}

/// Raw lines of a file.
pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// A record with fixed values and the given timestamp.
pub fn sample_record(timestamp: &str, bytes_sent: u64) -> MetricRecord {
    MetricRecord {
        timestamp: timestamp.to_string(),
        cpu_percent: 4.5,
        mem_percent: 33.25,
        download_speed: 90.5,
        upload_speed: 10.0,
        bandwidth_total: 100.5,
        latency: 12.0,
        link_status: LinkStatus::Up,
        health_status: HealthStatus::NotOkay,
        bytes_sent,
        bytes_recv: 100,
        traffic_volume: bytes_sent + 100,
    }
}
