//! Card Ledger Library
//! # Overview
//!
//! This library provides a terminal-driven account ledger: numbered card
//! accounts with a PIN, income, peer-to-peer transfers and account closure.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, LedgerError)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::luhn`] - Luhn checksum validation and check digit search
//!   - [`core::generator`] - Card number and PIN generation
//!   - [`core::traits`] - The `LedgerStore` contract, including transfer preconditions
//!   - [`core::bank`] - Account opening with collision retry
//! - [`store`] - In-memory and SQLite ledger backends
//! - [`io`] - Terminal menu session and CSV export
//!
//! # Card Numbers
//!
//! Every card number is 16 digits: the issuer prefix `400000`, a random
//! 9-digit payload and a Luhn check digit. Transfers only go to numbers that
//! pass the Luhn check.
//!
//! # Transfers
//!
//! A transfer is rejected, in this order, when:
//! - source and destination are the same card
//! - the destination fails the Luhn check
//! - the destination does not exist
//! - the amount is negative
//! - the source balance (re-read at transfer time) is too low
//!
//! Otherwise the debit and the credit are applied as one atomic unit.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod store;
pub mod types;

pub use self::core::{Bank, CardGenerator, LedgerStore};
pub use io::{write_accounts_csv, Session};
pub use store::{open_store, MemoryLedger, SqliteLedger};
pub use types::{Account, Balance, CardNumber, LedgerError, Pin};
