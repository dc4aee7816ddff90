//! Storage backends for the ledger
//!
//! This module holds the concrete `LedgerStore` implementations and a
//! factory that picks one at runtime from the command-line configuration.
//!
//! - `memory` - process-local `HashMap`, nothing persisted
//! - `sqlite` - durable SQLite database file

use crate::cli::BackendType;
use crate::core::LedgerStore;
use crate::types::LedgerError;
use std::path::Path;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;

/// Open the ledger store selected on the command line
///
/// # Arguments
///
/// * `backend` - Which backend to open
/// * `db_file` - Database file (ignored by the memory backend)
///
/// # Returns
///
/// A boxed store ready for use by the bank service
///
/// # Errors
///
/// Returns `StorageFailure` if the SQLite database cannot be opened or
/// initialized. This is the only error that ends the process.
pub fn open_store(backend: BackendType, db_file: &Path) -> Result<Box<dyn LedgerStore>, LedgerError> {
    match backend {
        BackendType::Sqlite => Ok(Box::new(SqliteLedger::open(db_file)?)),
        BackendType::Memory => Ok(Box::new(MemoryLedger::new())),
    }
}
