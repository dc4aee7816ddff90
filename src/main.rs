//! Card Ledger CLI
//!
//! Terminal banking menu over a SQLite (or in-memory) ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --db-file card.s3db
//! cargo run -- --backend memory
//! cargo run -- --db-file card.s3db --export > accounts.csv
//! ```
//!
//! Log output goes to stderr and is controlled with `RUST_LOG`
//! (default `warn`), so the menu on stdout stays clean.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (database cannot be opened, stdin/stdout failure)

use card_ledger::cli;
use card_ledger::io::{write_accounts_csv, Session};
use card_ledger::store::open_store;
use card_ledger::{Bank, LedgerError};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &cli::CliArgs) -> Result<(), LedgerError> {
    let store = open_store(args.backend, &args.db_file)?;
    let mut bank = Bank::new(store);

    if args.export {
        let accounts = bank.accounts()?;
        let mut output = io::stdout().lock();
        return write_accounts_csv(&accounts, &mut output);
    }

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    Session::new(&mut bank, stdin, stdout).run()
}
