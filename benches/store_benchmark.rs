//! Performance benchmarks for the metrics store
//!
//! Measures row formatting and parsing of stores of different sizes.
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use netmon::record::{HealthStatus, LinkStatus, MetricRecord, HEADER};
use netmon::store::parse_records;

fn record(i: u64) -> MetricRecord {
    MetricRecord {
        timestamp: format!("2024-06-01 10:{:02}:{:02}", (i / 60) % 60, i % 60),
        cpu_percent: (i % 100) as f64 + 0.25,
        mem_percent: 42.5,
        download_speed: 93.17,
        upload_speed: 18.4,
        bandwidth_total: 111.57,
        latency: 12.3,
        link_status: LinkStatus::Up,
        health_status: HealthStatus::Ok,
        bytes_sent: 1_000_000 + i * 1_500,
        bytes_recv: 9_000_000 + i * 4_000,
        traffic_volume: 10_000_000 + i * 5_500,
    }
}

/// Generate store contents with `rows` records
fn generate_store(rows: u64) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');
    for i in 0..rows {
        out.push_str(&record(i).to_row());
        out.push('\n');
    }
    out
}

/// Benchmark formatting a single row
fn bench_row_format(c: &mut Criterion) {
    let record = record(7);
    c.bench_function("row_format", |b| {
        b.iter(|| black_box(black_box(&record).to_row()));
    });
}

/// Benchmark parsing whole stores (one day of 1s ticks at the top end)
fn bench_store_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_parse");

    for rows in [100u64, 3_600, 86_400].iter() {
        let contents = generate_store(*rows);
        group.throughput(Throughput::Elements(*rows));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_rows", rows)),
            &contents,
            |b, contents| {
                b.iter(|| {
                    let report = parse_records(black_box(contents));
                    black_box(report)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_row_format, bench_store_parse);
criterion_main!(benches);
