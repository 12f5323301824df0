//! Append-only CSV store for metric records.
//!
//! The store is a single headered CSV file. The header is written only when
//! the file is empty at the moment of an append; every later append adds one
//! row. Nothing in this crate rewrites or truncates the file, and there is no
//! rotation: the file grows for as long as collection runs.

mod reader;

pub use reader::{parse_records, ReadReport};

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{classify_io_error, PersistenceError};
use crate::record::MetricRecord;

/// Handle on the metrics CSV file.
///
/// The file is opened per append and closed before `append` returns, so no
/// descriptor is held between ticks.
#[derive(Debug, Clone)]
pub struct MetricStore {
    path: PathBuf,
}

impl MetricStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, writing the header first if the file is empty.
    ///
    /// Missing parent directories are created.
    pub fn append(&self, record: &MetricRecord) -> Result<(), PersistenceError> {
        self.ensure_parent_dir()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| classify_io_error(e, &self.path, "open"))?;

        let is_empty = file
            .metadata()
            .map_err(|e| classify_io_error(e, &self.path, "stat"))?
            .len()
            == 0;

        let mut buf = String::with_capacity(256);
        if is_empty {
            buf.push_str(&MetricRecord::header_row());
            buf.push('\n');
        }
        buf.push_str(&record.to_row());
        buf.push('\n');

        // One write per tick keeps header and row together.
        file.write_all(buf.as_bytes())
            .map_err(|e| classify_io_error(e, &self.path, "append to"))?;
        file.flush()
            .map_err(|e| classify_io_error(e, &self.path, "flush"))?;
        Ok(())
    }

    /// Read every complete record in insertion order.
    ///
    /// A missing file reads as empty. Malformed rows and a trailing
    /// unterminated line are skipped.
    pub fn read_all(&self) -> Result<Vec<MetricRecord>, PersistenceError> {
        Ok(self.read_report()?.records)
    }

    /// Like [`read_all`](Self::read_all) but also reports skipped lines.
    pub fn read_report(&self) -> Result<ReadReport, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(parse_records(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ReadReport::default()),
            Err(e) => Err(classify_io_error(e, &self.path, "read")),
        }
    }

    /// The most recent complete record, if any.
    pub fn latest(&self) -> Result<Option<MetricRecord>, PersistenceError> {
        Ok(self.read_all()?.pop())
    }

    /// The last `limit` records (all when `None`), oldest first.
    pub fn history(&self, limit: Option<usize>) -> Result<Vec<MetricRecord>, PersistenceError> {
        let mut records = self.read_all()?;
        if let Some(limit) = limit {
            let skip = records.len().saturating_sub(limit);
            records.drain(..skip);
        }
        Ok(records)
    }

    fn ensure_parent_dir(&self) -> Result<(), PersistenceError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                fs::create_dir_all(parent).map_err(|e| {
                    PersistenceError::DirectoryCreationFailed {
                        path: parent.to_path_buf(),
                        message: e.to_string(),
                    }
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{HealthStatus, LinkStatus, HEADER};
    use tempfile::TempDir;

    fn record(ts: &str, sent: u64) -> MetricRecord {
        MetricRecord {
            timestamp: ts.to_string(),
            cpu_percent: 3.5,
            mem_percent: 50.0,
            download_speed: 0.0,
            upload_speed: 0.0,
            bandwidth_total: 0.0,
            latency: 0.0,
            link_status: LinkStatus::Up,
            health_status: HealthStatus::NotOkay,
            bytes_sent: sent,
            bytes_recv: 1,
            traffic_volume: sent + 1,
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = TempDir::new().unwrap();
        let store = MetricStore::new(dir.path().join("m.csv"));

        for i in 0..5 {
            store.append(&record("2024-01-01 00:00:00", i)).unwrap();
        }

        let contents = fs::read_to_string(store.path()).unwrap();
        let header = HEADER.join(",");
        assert_eq!(contents.lines().filter(|l| *l == header).count(), 1);
        assert_eq!(contents.lines().next(), Some(header.as_str()));
        assert_eq!(contents.lines().count(), 6);
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn test_reopen_appends_without_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.csv");

        MetricStore::new(&path).append(&record("2024-01-01 00:00:00", 1)).unwrap();
        MetricStore::new(&path).append(&record("2024-01-01 00:00:01", 2)).unwrap();

        let records = MetricStore::new(&path).read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].bytes_sent, 2);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = MetricStore::new(dir.path().join("nested").join("deeper").join("m.csv"));
        store.append(&record("2024-01-01 00:00:00", 1)).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = MetricStore::new(dir.path().join("absent.csv"));
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.latest().unwrap(), None);
    }

    #[test]
    fn test_latest_and_history_in_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = MetricStore::new(dir.path().join("m.csv"));
        let a = record("2024-01-01 00:00:00", 1);
        let b = record("2024-01-01 00:00:01", 2);
        let c = record("2024-01-01 00:00:02", 3);
        for r in [&a, &b, &c] {
            store.append(r).unwrap();
        }

        assert_eq!(store.latest().unwrap(), Some(c.clone()));
        assert_eq!(store.history(None).unwrap(), vec![a, b.clone(), c.clone()]);
        assert_eq!(store.history(Some(2)).unwrap(), vec![b, c]);
    }

    #[cfg(unix)]
    #[test]
    fn test_append_into_unwritable_dir_fails() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o500)).unwrap();

        let store = MetricStore::new(locked.join("m.csv"));
        let result = store.append(&record("2024-01-01 00:00:00", 1));

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();
        // Root ignores directory permissions, so only check when it applied.
        if let Err(err) = result {
            assert!(matches!(err, PersistenceError::PermissionDenied { .. }));
        }
    }
}
