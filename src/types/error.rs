//! Error types for the card ledger
//!
//! This module defines every error that a ledger operation can produce.
//! Errors are descriptive enough to log, while the terminal session maps
//! them onto its own short user-facing messages.
//!
//! # Error Categories
//!
//! - **Collisions**: a generated card number is already taken (retried, never shown)
//! - **Lookups**: wrong credentials, unknown account or transfer destination
//! - **Validation**: malformed destination number, negative amounts
//! - **Business rules**: insufficient funds, transfer to the same account
//! - **Storage**: SQLite or I/O failures (the operation is aborted, nothing is applied)

use super::account::Balance;
use thiserror::Error;

/// Main error type for the card ledger
///
/// Every variant is recoverable from the session's point of view: the
/// current operation is abandoned and the menu is shown again. Only a
/// failure to open the store at startup terminates the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// A card number is already present in the ledger
    ///
    /// The account opening flow regenerates and retries on this error.
    #[error("Card number {number} already exists")]
    DuplicateAccount {
        /// The colliding card number
        number: String,
    },

    /// No account exists with the given card number
    #[error("Account {number} not found")]
    AccountNotFound {
        /// The card number that was looked up
        number: String,
    },

    /// Card number and PIN do not identify an account
    ///
    /// Deliberately carries no detail about which of the two was wrong.
    #[error("Wrong card number or PIN")]
    InvalidCredentials,

    /// Source and destination of a transfer are the same card
    #[error("Cannot transfer money to the same account")]
    SameAccount,

    /// Transfer destination fails the Luhn check
    #[error("Invalid destination card number '{number}'")]
    InvalidDestinationFormat {
        /// The malformed card number
        number: String,
    },

    /// Transfer destination passes the Luhn check but is not in the ledger
    #[error("Destination account {number} does not exist")]
    DestinationNotFound {
        /// The unknown card number
        number: String,
    },

    /// Source balance is lower than the requested amount
    ///
    /// Both balances remain unchanged.
    #[error("Insufficient funds on {number}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Source card number
        number: String,
        /// Balance at the time of the check
        balance: Balance,
        /// Requested amount
        requested: Balance,
    },

    /// Amount is negative
    #[error("Invalid amount {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Balance,
    },

    /// Balance arithmetic would overflow
    #[error("Balance overflow on account {number}")]
    BalanceOverflow {
        /// Card number of the account that would overflow
        number: String,
    },

    /// The backing store failed; nothing was applied
    #[error("Storage failure: {message}")]
    StorageFailure {
        /// Description of the underlying failure
        message: String,
    },

    /// I/O error while reading input or writing output
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },
}

impl From<rusqlite::Error> for LedgerError {
    fn from(error: rusqlite::Error) -> Self {
        LedgerError::StorageFailure {
            message: error.to_string(),
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a DuplicateAccount error
    pub fn duplicate_account(number: &str) -> Self {
        LedgerError::DuplicateAccount {
            number: number.to_string(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(number: &str) -> Self {
        LedgerError::AccountNotFound {
            number: number.to_string(),
        }
    }

    /// Create an InvalidDestinationFormat error
    pub fn invalid_destination_format(number: &str) -> Self {
        LedgerError::InvalidDestinationFormat {
            number: number.to_string(),
        }
    }

    /// Create a DestinationNotFound error
    pub fn destination_not_found(number: &str) -> Self {
        LedgerError::DestinationNotFound {
            number: number.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(number: &str, balance: Balance, requested: Balance) -> Self {
        LedgerError::InsufficientFunds {
            number: number.to_string(),
            balance,
            requested,
        }
    }

    /// Create a BalanceOverflow error
    pub fn balance_overflow(number: &str) -> Self {
        LedgerError::BalanceOverflow {
            number: number.to_string(),
        }
    }

    /// Create a StorageFailure error
    pub fn storage_failure(message: impl Into<String>) -> Self {
        LedgerError::StorageFailure {
            message: message.into(),
        }
    }

    /// Whether this error leaves the caller able to retry or continue
    ///
    /// Storage and I/O failures are reported but say nothing about the
    /// user's input, everything else is a plain rejection.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            LedgerError::StorageFailure { .. } | LedgerError::Io { .. }
        )
    }
}
