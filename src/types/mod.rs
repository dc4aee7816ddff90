//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account record and identifier aliases
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;

pub use account::{Account, Balance, CardNumber, Pin};
pub use error::LedgerError;
