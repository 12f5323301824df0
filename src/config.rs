//! Collector configuration.
//!
//! Settings are layered: built-in defaults, then an optional JSON file, then
//! `NETMON_*` environment variables, then command-line flags (applied by the
//! CLI with the `with_*` setters).
//!
//! # Example
//!
//! ```ignore
//! use netmon::config::CollectorConfig;
//!
//! let config = CollectorConfig::load(None)?
//!     .with_store_path("/var/lib/netmon/metrics.csv")
//!     .with_probe_enabled(false);
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::record::DEFAULT_HEALTH_THRESHOLD_BYTES;

/// Default metrics store, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "system_metrics.csv";

/// Directory below the platform config dir holding `config.json`.
const CONFIG_DIR: &str = "netmon";

/// Config file name.
const CONFIG_FILE: &str = "config.json";

pub const ENV_STORE_PATH: &str = "NETMON_STORE_PATH";
pub const ENV_TICK_MS: &str = "NETMON_TICK_MS";
pub const ENV_PROBE_INTERVAL_SECS: &str = "NETMON_PROBE_INTERVAL_SECS";
pub const ENV_PROBE_TIMEOUT_SECS: &str = "NETMON_PROBE_TIMEOUT_SECS";
pub const ENV_HEALTH_THRESHOLD_BYTES: &str = "NETMON_HEALTH_THRESHOLD_BYTES";
pub const ENV_PROBE_DISABLED: &str = "NETMON_PROBE_DISABLED";

/// Speed probe endpoints and payload sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Run the speed probe at all. When false every probe reads as zero.
    pub enabled: bool,
    /// Small endpoint used for the reachability check and latency samples.
    pub latency_url: String,
    /// Endpoint returning the download payload.
    pub download_url: String,
    /// Endpoint accepting the upload payload.
    pub upload_url: String,
    /// Size of the upload payload in bytes.
    pub upload_bytes: u64,
    /// Number of latency round trips; the best one is reported.
    pub latency_samples: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            latency_url: "https://speed.cloudflare.com/__down?bytes=0".to_string(),
            download_url: "https://speed.cloudflare.com/__down?bytes=10000000".to_string(),
            upload_url: "https://speed.cloudflare.com/__up".to_string(),
            upload_bytes: 5_000_000,
            latency_samples: 3,
        }
    }
}

/// Settings for one collector run.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    /// CSV file the collector appends to.
    pub store_path: PathBuf,
    /// Nominal period of one tick (default: 1s).
    pub tick_period: Duration,
    /// Window over which CPU usage is averaged (default: 1s).
    pub cpu_window: Duration,
    /// The probe runs on ticks where whole elapsed seconds are a multiple
    /// of this value (default: 10).
    pub probe_interval_secs: u64,
    /// Upper bound on one probe run (default: 30s).
    pub probe_timeout: Duration,
    /// Cumulative traffic above which health reads "ok" (default: 10 MiB).
    pub health_threshold_bytes: u64,
    pub probe: ProbeConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            tick_period: Duration::from_secs(1),
            cpu_window: Duration::from_secs(1),
            probe_interval_secs: 10,
            probe_timeout: Duration::from_secs(30),
            health_threshold_bytes: DEFAULT_HEALTH_THRESHOLD_BYTES,
            probe: ProbeConfig::default(),
        }
    }
}

/// On-disk shape of `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    store_path: Option<PathBuf>,
    tick_ms: Option<u64>,
    cpu_window_ms: Option<u64>,
    probe_interval_secs: Option<u64>,
    probe_timeout_secs: Option<u64>,
    health_threshold_bytes: Option<u64>,
    probe: Option<ProbeConfig>,
}

impl CollectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    pub fn with_cpu_window(mut self, window: Duration) -> Self {
        self.cpu_window = window;
        self
    }

    pub fn with_probe_interval_secs(mut self, secs: u64) -> Self {
        self.probe_interval_secs = secs;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_health_threshold_bytes(mut self, bytes: u64) -> Self {
        self.health_threshold_bytes = bytes;
        self
    }

    pub fn with_probe_enabled(mut self, enabled: bool) -> Self {
        self.probe.enabled = enabled;
        self
    }

    pub fn with_probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = probe;
        self
    }

    /// Default location of the config file, if the platform has a config dir.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load defaults, then the config file, then environment overrides.
    ///
    /// An explicit `path` must exist. Without one, the default config file
    /// is used only when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_config_path().filter(|p| p.exists()),
        };
        if let Some(file) = file {
            config = config.merge_file(&file)?;
            tracing::debug!(path = %file.display(), "loaded config file");
        }

        config = config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from a JSON config file.
    pub fn merge_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: ConfigFile =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(store_path) = parsed.store_path {
            self.store_path = store_path;
        }
        if let Some(ms) = parsed.tick_ms {
            self.tick_period = Duration::from_millis(ms);
        }
        if let Some(ms) = parsed.cpu_window_ms {
            self.cpu_window = Duration::from_millis(ms);
        }
        if let Some(secs) = parsed.probe_interval_secs {
            self.probe_interval_secs = secs;
        }
        if let Some(secs) = parsed.probe_timeout_secs {
            self.probe_timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = parsed.health_threshold_bytes {
            self.health_threshold_bytes = bytes;
        }
        if let Some(probe) = parsed.probe {
            self.probe = probe;
        }
        Ok(self)
    }

    /// Overlay `NETMON_*` values looked up through `lookup`.
    ///
    /// Taking the lookup as a closure keeps this testable without touching
    /// the process environment.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_STORE_PATH) {
            self.store_path = PathBuf::from(path);
        }
        if let Some(ms) = parse_env_u64(&lookup, ENV_TICK_MS)? {
            self.tick_period = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_env_u64(&lookup, ENV_PROBE_INTERVAL_SECS)? {
            self.probe_interval_secs = secs;
        }
        if let Some(secs) = parse_env_u64(&lookup, ENV_PROBE_TIMEOUT_SECS)? {
            self.probe_timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = parse_env_u64(&lookup, ENV_HEALTH_THRESHOLD_BYTES)? {
            self.health_threshold_bytes = bytes;
        }
        if let Some(value) = lookup(ENV_PROBE_DISABLED) {
            self.probe.enabled = !is_truthy(&value);
        }
        Ok(self)
    }

    /// Reject settings the collector loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period.is_zero() {
            return Err(ConfigError::Invalid {
                field: "tick_period",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.probe_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "probe_interval_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.probe_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "probe_timeout",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_env_u64<F>(lookup: &F, variable: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(variable) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::Environment {
                variable: variable.to_string(),
                message: format!("'{}' is not a non-negative integer: {}", raw, e),
            }),
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert_eq!(config.store_path, PathBuf::from("system_metrics.csv"));
        assert_eq!(config.tick_period, Duration::from_secs(1));
        assert_eq!(config.probe_interval_secs, 10);
        assert_eq!(config.health_threshold_bytes, 10 * 1024 * 1024);
        assert!(config.probe.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = CollectorConfig::new()
            .with_store_path("/tmp/m.csv")
            .with_tick_period(Duration::from_millis(250))
            .with_probe_enabled(false);

        assert_eq!(config.store_path, PathBuf::from("/tmp/m.csv"));
        assert_eq!(config.tick_period, Duration::from_millis(250));
        assert!(!config.probe.enabled);
    }

    #[test]
    fn test_env_overrides() {
        let config = CollectorConfig::default()
            .apply_env(lookup_from(&[
                (ENV_STORE_PATH, "/data/metrics.csv"),
                (ENV_TICK_MS, "500"),
                (ENV_PROBE_INTERVAL_SECS, "60"),
                (ENV_HEALTH_THRESHOLD_BYTES, "1024"),
                (ENV_PROBE_DISABLED, "true"),
            ]))
            .unwrap();

        assert_eq!(config.store_path, PathBuf::from("/data/metrics.csv"));
        assert_eq!(config.tick_period, Duration::from_millis(500));
        assert_eq!(config.probe_interval_secs, 60);
        assert_eq!(config.health_threshold_bytes, 1024);
        assert!(!config.probe.enabled);
    }

    #[test]
    fn test_env_rejects_garbage() {
        let err = CollectorConfig::default()
            .apply_env(lookup_from(&[(ENV_TICK_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Environment { ref variable, .. } if variable == ENV_TICK_MS));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = CollectorConfig::default().with_probe_interval_secs(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "probe_interval_secs", .. })
        ));
    }

    #[test]
    fn test_merge_file_overrides_only_present_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "store_path": "custom.csv", "probe_interval_secs": 30, "probe": { "enabled": false } }"#,
        )
        .unwrap();

        let config = CollectorConfig::default().merge_file(&path).unwrap();
        assert_eq!(config.store_path, PathBuf::from("custom.csv"));
        assert_eq!(config.probe_interval_secs, 30);
        assert!(!config.probe.enabled);
        // Unlisted probe fields fall back to defaults.
        assert_eq!(config.probe.upload_bytes, ProbeConfig::default().upload_bytes);
        assert_eq!(config.tick_period, Duration::from_secs(1));
    }

    #[test]
    fn test_merge_file_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = CollectorConfig::default().merge_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let err = CollectorConfig::load(Some(Path::new("/nonexistent/netmon.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    #[serial]
    fn test_load_reads_process_env() {
        std::env::set_var(ENV_PROBE_INTERVAL_SECS, "20");
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{}").unwrap();

        let config = CollectorConfig::load(Some(&path));
        std::env::remove_var(ENV_PROBE_INTERVAL_SECS);

        assert_eq!(config.unwrap().probe_interval_secs, 20);
    }
}
