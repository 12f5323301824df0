//! `netmon collect`: run the collector until interrupted or a duration ends.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;

use super::args::CollectArgs;
use crate::cli_output::{icons, print_field, print_footer, print_header, print_status_line};
use crate::collector::{Collector, StopHandle};
use crate::config::CollectorConfig;

/// Layer command-line flags over the loaded configuration.
pub fn build_config(args: &CollectArgs) -> Result<CollectorConfig> {
    let mut config =
        CollectorConfig::load(args.config.as_deref()).wrap_err("Failed to load configuration")?;
    if let Some(store) = &args.store {
        config = config.with_store_path(store);
    }
    if args.no_probe {
        config = config.with_probe_enabled(false);
    }
    Ok(config)
}

/// Handle `netmon collect`.
///
/// `on_start` receives the run's stop handle so the caller can wire it to
/// an interrupt handler.
pub async fn handle_collect_command<F>(args: CollectArgs, on_start: F) -> Result<()>
where
    F: FnOnce(StopHandle),
{
    let config = build_config(&args)?;
    let store_path = config.store_path.clone();

    let handle = Collector::from_config(config).start();
    on_start(handle.stop_handle());

    if let Some(duration) = args.duration {
        let stop = handle.stop_handle();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            tracing::info!(secs = duration.as_secs(), "collection duration reached");
            stop.stop();
        });
    }

    let result = handle.join().await;

    print_header("NETMON COLLECTION FINISHED");
    print_field("Store", &store_path.display().to_string());
    match &result {
        Ok(rows) => {
            print_field("Rows written", &rows.to_string());
            print_status_line(icons::SUCCESS, "Collector stopped cleanly");
        }
        Err(e) => {
            print_status_line(icons::FAILURE, &e.user_message());
            print_status_line(icons::WARNING, e.recovery_hint());
        }
    }
    print_footer();

    result.wrap_err("Collector stopped with an error")?;
    Ok(())
}
