//! Per-second network traffic rates from cumulative counters.

/// Default warning threshold for `watch`: 1 MiB per second in either direction.
pub const DEFAULT_RATE_THRESHOLD: u64 = 1024 * 1024;

const UNITS: [&str; 5] = ["bytes", "KB", "MB", "GB", "TB"];

/// Render a byte count with a binary unit and one decimal, e.g. `1.5KB`.
///
/// Values past the terabyte range stay in `TB`.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in &UNITS[..UNITS.len() - 1] {
        if value < 1024.0 {
            return format!("{:.1}{}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1}{}", value, UNITS[UNITS.len() - 1])
}

/// Traffic observed between two counter reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficRate {
    pub sent_per_sec: u64,
    pub recv_per_sec: u64,
    pub total_sent: u64,
    pub total_recv: u64,
    /// Either direction moved more than the threshold.
    pub exceeded: bool,
}

/// Tracks the previous counter read and turns new reads into rates.
///
/// `observe` is expected to be called once per second; the returned rates
/// are plain deltas between consecutive calls.
#[derive(Debug, Clone)]
pub struct TrafficMonitor {
    threshold: u64,
    last: Option<(u64, u64)>,
}

impl TrafficMonitor {
    pub fn new(threshold_bytes_per_sec: u64) -> Self {
        Self {
            threshold: threshold_bytes_per_sec,
            last: None,
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Record cumulative counters and return the delta since the last call.
    ///
    /// The first observation has zero rates. A counter that went backwards
    /// (interface reset) yields zero for that direction.
    pub fn observe(&mut self, total_sent: u64, total_recv: u64) -> TrafficRate {
        let (sent_per_sec, recv_per_sec) = match self.last {
            Some((prev_sent, prev_recv)) => (
                total_sent.saturating_sub(prev_sent),
                total_recv.saturating_sub(prev_recv),
            ),
            None => (0, 0),
        };
        self.last = Some((total_sent, total_recv));

        TrafficRate {
            sent_per_sec,
            recv_per_sec,
            total_sent,
            total_recv,
            exceeded: sent_per_sec > self.threshold || recv_per_sec > self.threshold,
        }
    }
}

impl Default for TrafficMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_THRESHOLD)
    }
}
