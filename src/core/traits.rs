//! Core trait for ledger storage
//!
//! This module defines the storage abstraction that lets the in-memory and
//! SQLite backends be used interchangeably by the bank service and the
//! terminal session.

use crate::core::luhn;
use crate::types::{Account, Balance, LedgerError};
use tracing::warn;

/// Owner of every account record and balance
///
/// All operations are synchronous and assume a single caller. Mutations
/// either complete or leave the ledger untouched.
pub trait LedgerStore {
    /// Insert a new account with a zero balance
    ///
    /// Fails with `DuplicateAccount` if the number is already present.
    fn create_account(&mut self, number: &str, pin: &str) -> Result<Account, LedgerError>;

    /// Look up an account by exact number and PIN
    ///
    /// Fails with `InvalidCredentials` when either field does not match.
    fn find_by_credentials(&self, number: &str, pin: &str) -> Result<Account, LedgerError>;

    /// Look up an account by number alone
    fn find_by_number(&self, number: &str) -> Result<Account, LedgerError>;

    /// Add a non-negative amount to an account and return the refreshed record
    fn add_income(&mut self, number: &str, amount: Balance) -> Result<Account, LedgerError>;

    /// Debit `from` and credit `to` as one atomic unit
    ///
    /// [`LedgerStore::transfer`] checks both numbers and the amount first,
    /// but implementations are callable directly and must start with
    /// [`check_transfer_request`]. They then re-read the source balance
    /// inside the unit of work, reject with `InsufficientFunds` if it is
    /// lower than `amount`, and otherwise apply both balance changes or
    /// neither.
    fn apply_transfer(&mut self, from: &str, to: &str, amount: Balance)
        -> Result<(), LedgerError>;

    /// Delete the account matching both number and PIN
    fn close_account(&mut self, number: &str, pin: &str) -> Result<(), LedgerError>;

    /// All accounts ordered by card number
    fn accounts(&self) -> Result<Vec<Account>, LedgerError>;

    /// Run the destination checks of a transfer from `from` to `to`
    ///
    /// Returns the destination account if it can receive funds. The Luhn
    /// check runs before any storage lookup.
    fn resolve_destination(&self, from: &str, to: &str) -> Result<Account, LedgerError> {
        if from == to {
            return Err(LedgerError::SameAccount);
        }

        if !luhn::validate(to) {
            return Err(LedgerError::invalid_destination_format(to));
        }

        self.find_by_number(to).map_err(|e| match e {
            LedgerError::AccountNotFound { number } => LedgerError::DestinationNotFound { number },
            other => other,
        })
    }

    /// Move `amount` from one account to another
    ///
    /// Preconditions are checked in order, each short-circuiting before the
    /// next one touches storage:
    /// 1. same source and destination: `SameAccount`
    /// 2. destination fails the Luhn check: `InvalidDestinationFormat`
    /// 3. destination missing: `DestinationNotFound`
    /// 4. negative amount: `InvalidAmount`
    ///
    /// Steps 1-3 are [`LedgerStore::resolve_destination`].
    ///
    /// The balance check and the balance changes happen in
    /// [`LedgerStore::apply_transfer`].
    fn transfer(&mut self, from: &str, to: &str, amount: Balance) -> Result<(), LedgerError> {
        self.resolve_destination(from, to)?;

        if amount < 0 {
            warn!(from, to, amount, "rejected transfer with negative amount");
            return Err(LedgerError::InvalidAmount { amount });
        }

        self.apply_transfer(from, to, amount)
    }
}

/// Reject transfer requests that no balance can satisfy
///
/// A transfer to the source account would debit and credit the same
/// balance, and a negative amount would move money the wrong way past the
/// funds check.
pub fn check_transfer_request(from: &str, to: &str, amount: Balance) -> Result<(), LedgerError> {
    if from == to {
        return Err(LedgerError::SameAccount);
    }

    if amount < 0 {
        warn!(from, to, amount, "rejected transfer with negative amount");
        return Err(LedgerError::InvalidAmount { amount });
    }

    Ok(())
}

impl<T: LedgerStore + ?Sized> LedgerStore for Box<T> {
    fn create_account(&mut self, number: &str, pin: &str) -> Result<Account, LedgerError> {
        (**self).create_account(number, pin)
    }

    fn find_by_credentials(&self, number: &str, pin: &str) -> Result<Account, LedgerError> {
        (**self).find_by_credentials(number, pin)
    }

    fn find_by_number(&self, number: &str) -> Result<Account, LedgerError> {
        (**self).find_by_number(number)
    }

    fn add_income(&mut self, number: &str, amount: Balance) -> Result<Account, LedgerError> {
        (**self).add_income(number, amount)
    }

    fn apply_transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        (**self).apply_transfer(from, to, amount)
    }

    fn close_account(&mut self, number: &str, pin: &str) -> Result<(), LedgerError> {
        (**self).close_account(number, pin)
    }

    fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        (**self).accounts()
    }

    fn transfer(&mut self, from: &str, to: &str, amount: Balance) -> Result<(), LedgerError> {
        (**self).transfer(from, to, amount)
    }
}
