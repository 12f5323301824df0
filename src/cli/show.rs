//! `netmon show`: print the latest record and recent history from the store.

use std::path::PathBuf;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;

use super::args::ShowArgs;
use crate::cli_output::{icons, print_field, print_footer, print_header, print_section, print_status_line};
use crate::config::CollectorConfig;
use crate::record::MetricRecord;
use crate::store::MetricStore;

/// Rows listed when `--history` is not given.
pub const DEFAULT_HISTORY: usize = 10;

/// Label/value pairs describing one record.
pub fn summary_fields(record: &MetricRecord) -> Vec<(&'static str, String)> {
    vec![
        ("Time", record.timestamp.clone()),
        ("CPU", format!("{}%", record.cpu_percent)),
        ("Memory", format!("{}%", record.mem_percent)),
        ("Download", format!("{} Mbps", record.download_speed)),
        ("Upload", format!("{} Mbps", record.upload_speed)),
        ("Bandwidth", format!("{} Mbps", record.bandwidth_total)),
        ("Latency", format!("{} ms", record.latency)),
        ("Link", record.link_status.to_string()),
        ("Health", record.health_status.to_string()),
        ("Sent", record.bytes_sent.to_string()),
        ("Received", record.bytes_recv.to_string()),
        ("Traffic", record.traffic_volume.to_string()),
    ]
}

/// One compact history line.
pub fn history_line(record: &MetricRecord) -> String {
    format!(
        "{}  cpu {:>6}%  mem {:>6}%  bw {:>8} Mbps  {:>4}  {}",
        record.timestamp,
        record.cpu_percent,
        record.mem_percent,
        record.bandwidth_total,
        record.link_status.as_str(),
        record.health_status.as_str(),
    )
}

/// Store path from `--store`, else from configuration.
pub fn resolve_store_path(store: Option<PathBuf>, config: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(store) = store {
        return Ok(store);
    }
    let config = CollectorConfig::load(config.as_deref()).wrap_err("Failed to load configuration")?;
    Ok(config.store_path)
}

/// Handle `netmon show`.
pub fn handle_show_command(args: ShowArgs) -> Result<()> {
    let path = resolve_store_path(args.store, args.config)?;
    let store = MetricStore::new(&path);
    let report = store
        .read_report()
        .wrap_err_with(|| format!("Failed to read metrics from {}", path.display()))?;

    let limit = args.history.unwrap_or(DEFAULT_HISTORY);
    let skip = report.records.len().saturating_sub(limit);
    let history = &report.records[skip..];

    if args.json {
        let out = serde_json::json!({
            "latest": report.records.last(),
            "history": history,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_header("NETMON LATEST SAMPLE");
    match report.records.last() {
        Some(latest) => {
            for (label, value) in summary_fields(latest) {
                print_field(label, &value);
            }
            if latest.is_healthy() {
                print_status_line(icons::SUCCESS, "Link up and traffic above health threshold");
            } else {
                print_status_line(icons::FAILURE, "Link down or traffic below health threshold");
            }
        }
        None => print_status_line(icons::WARNING, &format!("No records in {}", path.display())),
    }

    if !history.is_empty() {
        print_section(&format!("HISTORY (last {})", history.len()));
        for record in history {
            println!("  {}", history_line(record));
        }
    }

    if report.malformed > 0 {
        print_status_line(
            icons::WARNING,
            &format!("{} malformed row(s) skipped", report.malformed),
        );
    }
    print_footer();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{HealthStatus, LinkStatus};

    fn record() -> MetricRecord {
        MetricRecord {
            timestamp: "2024-05-01 08:00:00".to_string(),
            cpu_percent: 7.25,
            mem_percent: 61.0,
            download_speed: 0.0,
            upload_speed: 0.0,
            bandwidth_total: 0.0,
            latency: 0.0,
            link_status: LinkStatus::Up,
            health_status: HealthStatus::NotOkay,
            bytes_sent: 10,
            bytes_recv: 20,
            traffic_volume: 30,
        }
    }

    #[test]
    fn test_summary_fields() {
        let fields = summary_fields(&record());
        assert_eq!(fields.len(), 12);
        assert_eq!(fields[1], ("CPU", "7.25%".to_string()));
        assert_eq!(fields[7], ("Link", "up".to_string()));
        assert_eq!(fields[8], ("Health", "not okay".to_string()));
    }

    #[test]
    fn test_history_line_contains_status() {
        let line = history_line(&record());
        assert!(line.starts_with("2024-05-01 08:00:00"));
        assert!(line.ends_with("up  not okay"));
    }

    #[test]
    fn test_resolve_store_path_prefers_flag() {
        let path = resolve_store_path(Some(PathBuf::from("x.csv")), None).unwrap();
        assert_eq!(path, PathBuf::from("x.csv"));
    }

    #[test]
    fn test_show_handles_missing_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = ShowArgs {
            store: Some(dir.path().join("absent.csv")),
            ..ShowArgs::default()
        };
        assert!(handle_show_command(args).is_ok());
    }
}
