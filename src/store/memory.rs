//! In-memory ledger backend
//!
//! This module provides `MemoryLedger`, which keeps every account in a
//! `HashMap` keyed by card number. Nothing survives the process; it backs
//! the `--backend memory` mode and the contract tests.
//!
//! Transfers are atomic because both new balances are computed with checked
//! arithmetic before either account is written.

use crate::core::{check_transfer_request, LedgerStore};
use crate::types::{Account, Balance, CardNumber, LedgerError};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Ledger backed by a process-local map
#[derive(Debug, Default)]
pub struct MemoryLedger {
    /// Map of card numbers to accounts
    accounts: HashMap<CardNumber, Account>,
}

impl MemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        MemoryLedger {
            accounts: HashMap::new(),
        }
    }

    /// Number of accounts currently held
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the ledger holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn get_mut(&mut self, number: &str) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(number)
            .ok_or_else(|| LedgerError::account_not_found(number))
    }
}

impl LedgerStore for MemoryLedger {
    fn create_account(&mut self, number: &str, pin: &str) -> Result<Account, LedgerError> {
        if self.accounts.contains_key(number) {
            return Err(LedgerError::duplicate_account(number));
        }

        let account = Account::new(number, pin);
        self.accounts.insert(number.to_string(), account.clone());
        info!(number, "account created");

        Ok(account)
    }

    fn find_by_credentials(&self, number: &str, pin: &str) -> Result<Account, LedgerError> {
        self.accounts
            .get(number)
            .filter(|account| account.matches(number, pin))
            .cloned()
            .ok_or(LedgerError::InvalidCredentials)
    }

    fn find_by_number(&self, number: &str) -> Result<Account, LedgerError> {
        debug!(number, "looking up account");
        self.accounts
            .get(number)
            .cloned()
            .ok_or_else(|| LedgerError::account_not_found(number))
    }

    fn add_income(&mut self, number: &str, amount: Balance) -> Result<Account, LedgerError> {
        if amount < 0 {
            warn!(number, amount, "rejected negative income");
            return Err(LedgerError::InvalidAmount { amount });
        }

        let account = self.get_mut(number)?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::balance_overflow(number))?;
        info!(number, amount, "income added");

        Ok(account.clone())
    }

    fn apply_transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        check_transfer_request(from, to, amount)?;

        let source = self
            .accounts
            .get(from)
            .ok_or_else(|| LedgerError::account_not_found(from))?;
        let destination = self
            .accounts
            .get(to)
            .ok_or_else(|| LedgerError::destination_not_found(to))?;

        if source.balance < amount {
            warn!(from, balance = source.balance, amount, "insufficient funds");
            return Err(LedgerError::insufficient_funds(from, source.balance, amount));
        }

        // Compute both sides first so a failure leaves both untouched
        let new_source = source
            .balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::balance_overflow(from))?;
        let new_destination = destination
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::balance_overflow(to))?;

        self.get_mut(from)?.balance = new_source;
        self.get_mut(to)?.balance = new_destination;
        info!(from, to, amount, "transfer completed");

        Ok(())
    }

    fn close_account(&mut self, number: &str, pin: &str) -> Result<(), LedgerError> {
        let matches = self
            .accounts
            .get(number)
            .is_some_and(|account| account.matches(number, pin));
        if !matches {
            return Err(LedgerError::InvalidCredentials);
        }

        self.accounts.remove(number);
        info!(number, "account closed");

        Ok(())
    }

    fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let mut accounts: Vec<Account> = self.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(accounts)
    }
}
