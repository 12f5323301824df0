//! The persisted metrics record and the values derived for it.
//!
//! One [`MetricRecord`] is written per collector tick. The CSV column order
//! is fixed by [`HEADER`] and must not change: readers rely on it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column names, in the order every row is written.
pub const HEADER: [&str; 12] = [
    "timestamp",
    "cpu_percent",
    "mem_percent",
    "download_speed",
    "upload_speed",
    "bandwidth_total",
    "latency",
    "link_status",
    "health_status",
    "bytes_sent",
    "bytes_recv",
    "traffic_volume",
];

/// Timestamp format used in the `timestamp` column (local clock).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default health threshold: 10 MiB of cumulative traffic.
pub const DEFAULT_HEALTH_THRESHOLD_BYTES: u64 = 10 * 1024 * 1024;

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregate link state across all network interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Up,
    Down,
}

impl LinkStatus {
    /// `Up` iff at least one interface reports up. No interfaces means `Down`.
    pub fn from_interfaces<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        if flags.into_iter().any(|up| up) {
            LinkStatus::Up
        } else {
            LinkStatus::Down
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Up => "up",
            LinkStatus::Down => "down",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(LinkStatus::Up),
            "down" => Ok(LinkStatus::Down),
            other => Err(format!("invalid link status '{}'", other)),
        }
    }
}

/// Network health derived from cumulative traffic.
///
/// The threshold is compared against counters accumulated since boot, not a
/// per-tick delta, so once a host has moved more than the threshold it reads
/// `Ok` for the rest of its uptime. This makes it a weak signal after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "not okay")]
    NotOkay,
}

impl HealthStatus {
    /// `Ok` iff `traffic_volume` is strictly greater than `threshold_bytes`.
    pub fn from_traffic(traffic_volume: u64, threshold_bytes: u64) -> Self {
        if traffic_volume > threshold_bytes {
            HealthStatus::Ok
        } else {
            HealthStatus::NotOkay
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Ok => "ok",
            HealthStatus::NotOkay => "not okay",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(HealthStatus::Ok),
            "not okay" => Ok(HealthStatus::NotOkay),
            other => Err(format!("invalid health status '{}'", other)),
        }
    }
}

/// One row of the metrics store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub timestamp: String,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    /// Mbps, carried forward from the last successful probe.
    pub download_speed: f64,
    /// Mbps, carried forward from the last successful probe.
    pub upload_speed: f64,
    pub bandwidth_total: f64,
    /// Milliseconds, carried forward from the last successful probe.
    pub latency: f64,
    pub link_status: LinkStatus,
    pub health_status: HealthStatus,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub traffic_volume: u64,
}

impl MetricRecord {
    /// True when the host reads healthy and at least one link is up.
    pub fn is_healthy(&self) -> bool {
        self.health_status == HealthStatus::Ok && self.link_status == LinkStatus::Up
    }

    /// Render as a CSV row without the trailing newline.
    pub fn to_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            self.timestamp,
            self.cpu_percent,
            self.mem_percent,
            self.download_speed,
            self.upload_speed,
            self.bandwidth_total,
            self.latency,
            self.link_status,
            self.health_status,
            self.bytes_sent,
            self.bytes_recv,
            self.traffic_volume,
        )
    }

    /// The header line without the trailing newline.
    pub fn header_row() -> String {
        HEADER.join(",")
    }
}

/// Error returned when a CSV row cannot be parsed back into a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowParseError {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("column '{column}': {message}")]
    InvalidValue {
        column: &'static str,
        message: String,
    },
}

fn parse_column<T>(raw: &str, column: &'static str) -> Result<T, RowParseError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| RowParseError::InvalidValue {
        column,
        message: e.to_string(),
    })
}

impl FromStr for MetricRecord {
    type Err = RowParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let cols: Vec<&str> = line.trim_end_matches('\r').split(',').collect();
        if cols.len() != HEADER.len() {
            return Err(RowParseError::ColumnCount {
                expected: HEADER.len(),
                found: cols.len(),
            });
        }

        Ok(MetricRecord {
            timestamp: cols[0].to_string(),
            cpu_percent: parse_column(cols[1], HEADER[1])?,
            mem_percent: parse_column(cols[2], HEADER[2])?,
            download_speed: parse_column(cols[3], HEADER[3])?,
            upload_speed: parse_column(cols[4], HEADER[4])?,
            bandwidth_total: parse_column(cols[5], HEADER[5])?,
            latency: parse_column(cols[6], HEADER[6])?,
            link_status: parse_column(cols[7], HEADER[7])?,
            health_status: parse_column(cols[8], HEADER[8])?,
            bytes_sent: parse_column(cols[9], HEADER[9])?,
            bytes_recv: parse_column(cols[10], HEADER[10])?,
            traffic_volume: parse_column(cols[11], HEADER[11])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> MetricRecord {
        MetricRecord {
            timestamp: "2024-03-01 12:00:00".to_string(),
            cpu_percent: 12.5,
            mem_percent: 48.25,
            download_speed: 95.12,
            upload_speed: 20.0,
            bandwidth_total: 115.12,
            latency: 14.3,
            link_status: LinkStatus::Up,
            health_status: HealthStatus::Ok,
            bytes_sent: 1_000,
            bytes_recv: 2_000,
            traffic_volume: 3_000,
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235_1), 1.24);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_link_status_any_up() {
        assert_eq!(LinkStatus::from_interfaces([false, true, false]), LinkStatus::Up);
        assert_eq!(LinkStatus::from_interfaces([false, false]), LinkStatus::Down);
        assert_eq!(LinkStatus::from_interfaces(Vec::<bool>::new()), LinkStatus::Down);
    }

    #[test]
    fn test_health_threshold_is_strict() {
        let threshold = DEFAULT_HEALTH_THRESHOLD_BYTES;
        assert_eq!(HealthStatus::from_traffic(threshold, threshold), HealthStatus::NotOkay);
        assert_eq!(HealthStatus::from_traffic(threshold + 1, threshold), HealthStatus::Ok);
        assert_eq!(HealthStatus::from_traffic(0, threshold), HealthStatus::NotOkay);
    }

    #[test]
    fn test_header_row_order() {
        assert_eq!(
            MetricRecord::header_row(),
            "timestamp,cpu_percent,mem_percent,download_speed,upload_speed,bandwidth_total,latency,link_status,health_status,bytes_sent,bytes_recv,traffic_volume"
        );
    }

    #[test]
    fn test_to_row_formats_zero_without_decimal() {
        let mut record = sample_record();
        record.download_speed = 0.0;
        record.upload_speed = 0.0;
        record.bandwidth_total = 0.0;
        record.latency = 0.0;
        record.health_status = HealthStatus::NotOkay;

        assert_eq!(
            record.to_row(),
            "2024-03-01 12:00:00,12.5,48.25,0,0,0,0,up,not okay,1000,2000,3000"
        );
    }

    #[test]
    fn test_row_parses_back() {
        let record = sample_record();
        let parsed: MetricRecord = record.to_row().parse().unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_parse_rejects_short_row() {
        let err = "2024-03-01 12:00:00,1,2".parse::<MetricRecord>().unwrap_err();
        assert_eq!(err, RowParseError::ColumnCount { expected: 12, found: 3 });
    }

    #[test]
    fn test_parse_rejects_bad_status() {
        let row = sample_record().to_row().replace(",up,", ",sideways,");
        let err = row.parse::<MetricRecord>().unwrap_err();
        assert!(matches!(err, RowParseError::InvalidValue { column: "link_status", .. }));
    }

    #[test]
    fn test_is_healthy_requires_link_up() {
        let mut record = sample_record();
        assert!(record.is_healthy());
        record.link_status = LinkStatus::Down;
        assert!(!record.is_healthy());
    }

    #[test]
    fn test_json_uses_wire_names() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["link_status"], "up");
        assert_eq!(json["health_status"], "ok");
    }
}
