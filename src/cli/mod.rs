// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{BackendType, CliArgs, DEFAULT_DB_FILE};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (unknown backend, missing value, or --help), clap
/// prints the error or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
