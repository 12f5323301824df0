//! Command-line argument parsing for the netmon CLI.
//!
//! Arguments are parsed by hand: a subcommand word (default `collect`)
//! followed by its flags. `--version` and `--help` win wherever they appear.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Options for `netmon collect`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectArgs {
    pub store: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// Stop automatically after this long.
    pub duration: Option<Duration>,
    pub no_probe: bool,
}

/// Options for `netmon show`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowArgs {
    pub store: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// Number of most recent rows to list.
    pub history: Option<usize>,
    pub json: bool,
}

/// Options for `netmon watch`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchArgs {
    /// Per-second rate above which a warning is logged.
    pub threshold: Option<u64>,
    pub duration: Option<Duration>,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Run the collector (default)
    Collect(CollectArgs),
    /// Print the latest record and recent history
    Show(ShowArgs),
    /// Log live traffic rates
    Watch(WatchArgs),
    /// Show version information
    Version,
    /// Show usage
    Help,
}

/// Argument errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgsError {
    #[error("missing value for {flag}")]
    MissingValue { flag: String },

    #[error("invalid value '{value}' for {flag}")]
    InvalidValue { flag: String, value: String },

    #[error("unexpected argument '{0}'")]
    Unexpected(String),
}

pub const USAGE: &str = "\
Usage: netmon [COMMAND] [OPTIONS]

Commands:
  collect   Sample host metrics every second into the CSV store (default)
  show      Print the latest record and recent history
  watch     Log live network traffic rates

Collect options:
  --store PATH       Metrics CSV file
  --config PATH      JSON config file
  --duration SECS    Stop after SECS seconds
  --no-probe         Disable the speed probe

Show options:
  --store PATH       Metrics CSV file
  --config PATH      JSON config file
  --history N        Number of recent rows to list (default 10)
  --json             Print JSON instead of a table

Watch options:
  --threshold BYTES  Warn when either direction exceeds BYTES per second
  --duration SECS    Stop after SECS seconds

  -V, --version      Print version
  -h, --help         Print this help";

/// Parse command-line arguments and return the command to execute.
///
/// # Examples
///
/// ```
/// use netmon::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["netmon".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap(), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    if args.iter().any(|a| a == "--version" || a == "-V") {
        return Ok(CliCommand::Version);
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(CliCommand::Help);
    }

    let (subcommand, rest) = match args.first().map(String::as_str) {
        Some("collect") | Some("show") | Some("watch") => (args[0].as_str(), &args[1..]),
        _ => ("collect", &args[..]),
    };

    let mut iter = rest.iter();
    match subcommand {
        "show" => {
            let mut out = ShowArgs::default();
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--store" => out.store = Some(PathBuf::from(value(&mut iter, arg)?)),
                    "--config" => out.config = Some(PathBuf::from(value(&mut iter, arg)?)),
                    "--history" => out.history = Some(number(&mut iter, arg)?),
                    "--json" => out.json = true,
                    other => return Err(ArgsError::Unexpected(other.to_string())),
                }
            }
            Ok(CliCommand::Show(out))
        }
        "watch" => {
            let mut out = WatchArgs::default();
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--threshold" => out.threshold = Some(number(&mut iter, arg)?),
                    "--duration" => out.duration = Some(Duration::from_secs(number(&mut iter, arg)?)),
                    other => return Err(ArgsError::Unexpected(other.to_string())),
                }
            }
            Ok(CliCommand::Watch(out))
        }
        _ => {
            let mut out = CollectArgs::default();
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--store" => out.store = Some(PathBuf::from(value(&mut iter, arg)?)),
                    "--config" => out.config = Some(PathBuf::from(value(&mut iter, arg)?)),
                    "--duration" => out.duration = Some(Duration::from_secs(number(&mut iter, arg)?)),
                    "--no-probe" => out.no_probe = true,
                    other => return Err(ArgsError::Unexpected(other.to_string())),
                }
            }
            Ok(CliCommand::Collect(out))
        }
    }
}

fn value<'a, I>(iter: &mut I, flag: &str) -> Result<&'a String, ArgsError>
where
    I: Iterator<Item = &'a String>,
{
    iter.next().ok_or_else(|| ArgsError::MissingValue {
        flag: flag.to_string(),
    })
}

fn number<'a, I, T>(iter: &mut I, flag: &str) -> Result<T, ArgsError>
where
    I: Iterator<Item = &'a String>,
    T: std::str::FromStr,
{
    let raw = value(iter, flag)?;
    raw.parse().map_err(|_| ArgsError::InvalidValue {
        flag: flag.to_string(),
        value: raw.clone(),
    })
}
