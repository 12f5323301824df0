//! CLI module for netmon.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - The `collect`, `show` and `watch` commands
//!
//! # Usage
//!
//! ```ignore
//! use netmon::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! let runtime = tokio::runtime::Runtime::new()?;
//! runtime.block_on(run_cli_command(command))?;
//! ```

pub mod args;
pub mod collect;
pub mod show;
pub mod version;
pub mod watch;

pub use args::{parse_args, ArgsError, CliCommand, CollectArgs, ShowArgs, WatchArgs, USAGE};
pub use collect::handle_collect_command;
pub use show::handle_show_command;
pub use version::{handle_version_command, version_line, VERSION};
pub use watch::handle_watch_command;

use color_eyre::Result;

use crate::collector::StopHandle;

/// Raise `stop` on Ctrl+C.
///
/// Only one handler can be installed per process; a second call is ignored.
pub fn install_interrupt_handler(stop: StopHandle) {
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("interrupt received, stopping");
        stop.stop();
    }) {
        tracing::debug!("interrupt handler not installed: {}", e);
    }
}

/// Run a parsed CLI command to completion.
///
/// `Version` never returns as it calls `std::process::exit(0)`.
pub async fn run_cli_command(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Show(args) => handle_show_command(args),
        CliCommand::Watch(args) => {
            let stop = StopHandle::new();
            install_interrupt_handler(stop.clone());
            handle_watch_command(args, stop).await
        }
        CliCommand::Collect(args) => handle_collect_command(args, install_interrupt_handler).await,
    }
}
