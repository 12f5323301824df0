use netmon::cli::{parse_args, run_cli_command, USAGE};

use color_eyre::Result;

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netmon=info"));

    // stdout carries command output only.
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    init_logging();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_cli_command(command))
}
