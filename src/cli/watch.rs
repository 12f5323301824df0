//! `netmon watch`: log per-second network traffic and warn on bursts.

use std::time::Duration;

use color_eyre::Result;
use tokio::sync::watch;
use tokio::time::Instant;

use super::args::WatchArgs;
use crate::adapters::SysinfoSampler;
use crate::collector::StopHandle;
use crate::system::{format_size, TrafficMonitor, TrafficRate, DEFAULT_RATE_THRESHOLD};
use crate::traits::HostSampler;

/// Sample counters every `period` and pass each rate to `on_rate` until the
/// stop signal is raised. Returns the number of rates produced.
pub async fn watch_traffic<S, F>(
    sampler: &mut S,
    monitor: &mut TrafficMonitor,
    period: Duration,
    mut stop_rx: watch::Receiver<bool>,
    mut on_rate: F,
) -> u64
where
    S: HostSampler + ?Sized,
    F: FnMut(&TrafficRate),
{
    let mut observed = 0;
    loop {
        if *stop_rx.borrow() {
            break;
        }

        let started = Instant::now();
        match sampler.sample().await {
            Ok(sample) => {
                let rate = monitor.observe(sample.bytes_sent, sample.bytes_recv);
                on_rate(&rate);
                observed += 1;
            }
            Err(e) => tracing::warn!(code = e.error_code(), "traffic sample failed: {}", e),
        }

        let pause = period.saturating_sub(started.elapsed());
        tokio::select! {
            _ = tokio::time::sleep(pause) => {}
            _ = stop_rx.wait_for(|stopped| *stopped) => break,
        }
    }
    observed
}

/// Log one rate the way the watch command reports it.
pub fn log_rate(rate: &TrafficRate, threshold: u64) {
    tracing::info!(
        "Received: {}  Receiving: {}/s  Sent: {}  Sending: {}/s",
        format_size(rate.total_recv),
        format_size(rate.recv_per_sec),
        format_size(rate.total_sent),
        format_size(rate.sent_per_sec),
    );
    if rate.exceeded {
        tracing::warn!("Network traffic speed exceeds {}/s", format_size(threshold));
    }
}

/// Handle `netmon watch`.
pub async fn handle_watch_command(args: WatchArgs, stop: StopHandle) -> Result<()> {
    let threshold = args.threshold.unwrap_or(DEFAULT_RATE_THRESHOLD);
    let mut monitor = TrafficMonitor::new(threshold);
    // Only network counters matter here, so use the shortest CPU window.
    let mut sampler = SysinfoSampler::new(Duration::ZERO);

    if let Some(duration) = args.duration {
        let stop = stop.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            stop.stop();
        });
    }

    tracing::info!(threshold = %format_size(threshold), "watching network traffic");
    let observed = watch_traffic(
        &mut sampler,
        &mut monitor,
        Duration::from_secs(1),
        stop.subscribe(),
        |rate| log_rate(rate, threshold),
    )
    .await;
    tracing::info!(observations = observed, "traffic watch stopped");
    Ok(())
}
