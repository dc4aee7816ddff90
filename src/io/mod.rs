//! I/O module
//!
//! Handles the terminal dialogue and ledger export.
//!
//! # Components
//!
//! - `session` - Numbered-menu session over any reader/writer pair
//! - `csv_format` - CSV export of account balances

pub mod csv_format;
pub mod session;

pub use csv_format::write_accounts_csv;
pub use session::Session;
