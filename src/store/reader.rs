//! Parsing of the metrics CSV for readers.
//!
//! The collector may be mid-append while a reader runs, so only lines
//! terminated by `\n` are considered complete.

use crate::record::{MetricRecord, HEADER};

/// Records parsed from a store plus counts of what was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadReport {
    pub records: Vec<MetricRecord>,
    /// Rows that did not parse as records.
    pub malformed: usize,
    /// True when the last line had no terminating newline and was ignored.
    pub partial_tail: bool,
}

/// Parse store contents into records.
pub fn parse_records(contents: &str) -> ReadReport {
    let mut report = ReadReport::default();

    let complete = match contents.rfind('\n') {
        Some(idx) => {
            report.partial_tail = idx + 1 < contents.len();
            &contents[..idx + 1]
        }
        None => {
            report.partial_tail = !contents.is_empty();
            ""
        }
    };

    let header = HEADER.join(",");
    for (line_no, line) in complete.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line == header {
            continue;
        }
        match line.parse::<MetricRecord>() {
            Ok(record) => report.records.push(record),
            Err(e) => {
                report.malformed += 1;
                tracing::warn!(line = line_no + 1, error = %e, "skipping malformed metrics row");
            }
        }
    }

    report
}
