//! Version command for the netmon CLI.

/// The current version of netmon, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The line printed by `netmon --version`.
pub fn version_line() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), VERSION)
}

/// Handle the --version command.
///
/// Prints the version string and exits successfully.
pub fn handle_version_command() -> ! {
    println!("{}", version_line());
    std::process::exit(0)
}
