use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Default database file, shared with earlier releases of the tool
pub const DEFAULT_DB_FILE: &str = "card.s3db";

/// Terminal card ledger: open accounts, add income, transfer and close
#[derive(Parser, Debug)]
#[command(name = "card-ledger")]
#[command(about = "Terminal card ledger with Luhn-checked card numbers", long_about = None)]
pub struct CliArgs {
    /// SQLite database file holding the ledger
    #[arg(
        long = "db-file",
        visible_alias = "file-name",
        value_name = "PATH",
        default_value = DEFAULT_DB_FILE,
        help = "Path to the SQLite database file (created if missing)"
    )]
    pub db_file: PathBuf,

    /// Storage backend
    #[arg(
        long = "backend",
        value_name = "BACKEND",
        default_value = "sqlite",
        help = "Storage backend: 'sqlite' for the database file or 'memory' for a throwaway ledger"
    )]
    pub backend: BackendType,

    /// Export the ledger as CSV instead of starting the menu
    #[arg(long = "export", help = "Write all accounts as CSV to stdout and exit")]
    pub export: bool,
}

/// Available ledger storage backends
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendType {
    Sqlite,
    Memory,
}
