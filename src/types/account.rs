//! Account-related types for the card ledger
//!
//! This module defines the Account record and the identifier aliases
//! shared by the generator, the stores and the terminal session.

use serde::Serialize;

/// Card number: 16 decimal digits (issuer prefix + payload + Luhn check digit)
pub type CardNumber = String;

/// Card PIN: 4 zero-padded decimal digits
pub type Pin = String;

/// Balance in minor currency units
pub type Balance = i64;

/// A single ledger account
///
/// Accounts are created with a zero balance, mutated in place by income
/// and transfers, and removed entirely when closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Globally unique card number
    pub number: CardNumber,

    /// Plain-text PIN
    ///
    /// Stored and compared as-is. This is a known weakness carried over
    /// deliberately; hashing is not part of the ledger's contract.
    #[serde(skip)]
    pub pin: Pin,

    /// Current balance, never negative after a completed operation
    pub balance: Balance,
}

impl Account {
    /// Create a new account with a zero balance
    ///
    /// # Arguments
    ///
    /// * `number` - The card number for this account
    /// * `pin` - The card PIN
    pub fn new(number: impl Into<CardNumber>, pin: impl Into<Pin>) -> Self {
        Account {
            number: number.into(),
            pin: pin.into(),
            balance: 0,
        }
    }

    /// Check whether the supplied credentials match this account exactly
    pub fn matches(&self, number: &str, pin: &str) -> bool {
        self.number == number && self.pin == pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_starts_empty() {
        let account = Account::new("4000000000000002", "0042");
        assert_eq!(account.number, "4000000000000002");
        assert_eq!(account.pin, "0042");
        assert_eq!(account.balance, 0);
    }

    #[test]
    fn test_matches_requires_both_fields() {
        let account = Account::new("4000000000000002", "0042");
        assert!(account.matches("4000000000000002", "0042"));
        assert!(!account.matches("4000000000000002", "0043"));
        assert!(!account.matches("4000000000000010", "0042"));
    }
}
