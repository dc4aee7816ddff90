//! SQLite ledger backend
//!
//! Accounts live in a single `account` table. The UNIQUE constraint on
//! `number` detects collisions and the CHECK constraint on `balance` keeps
//! the non-negative invariant at the storage level as well.
//!
//! Transfers run inside an IMMEDIATE transaction: the source balance is
//! re-read under the write lock, and any failure before commit rolls both
//! updates back.

use crate::core::{check_transfer_request, LedgerStore};
use crate::types::{Account, Balance, LedgerError};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use tracing::{debug, error, info, warn};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS account (
    id INTEGER PRIMARY KEY,
    number TEXT NOT NULL UNIQUE,
    pin TEXT NOT NULL,
    balance INTEGER NOT NULL DEFAULT 0 CHECK (balance >= 0)
)";

/// Ledger backed by a SQLite database
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    /// Open (or create) a database file and ensure the schema exists
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the file cannot be opened or the schema
    /// cannot be created.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)?;
        // WAL for crash recovery
        conn.pragma_update(None, "journal_mode", "WAL")?;
        info!(path = %path.display(), "opened ledger database");
        Self::with_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, LedgerError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, LedgerError> {
        conn.execute(SCHEMA, [])?;
        Ok(SqliteLedger { conn })
    }

    fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
        Ok(Account {
            number: row.get(0)?,
            pin: row.get(1)?,
            balance: row.get(2)?,
        })
    }

    fn balance_of(conn: &Connection, number: &str) -> Result<Option<Balance>, LedgerError> {
        let balance = conn
            .query_row(
                "SELECT balance FROM account WHERE number = ?1",
                params![number],
                |row| row.get(0),
            )
            .optional()?;
        Ok(balance)
    }

    /// Run the balance check and both updates inside one transaction
    fn transfer_in_transaction(
        &mut self,
        from: &str,
        to: &str,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let source = Self::balance_of(&tx, from)?
            .ok_or_else(|| LedgerError::account_not_found(from))?;
        let destination = Self::balance_of(&tx, to)?
            .ok_or_else(|| LedgerError::destination_not_found(to))?;

        if source < amount {
            warn!(from, balance = source, amount, "insufficient funds");
            return Err(LedgerError::insufficient_funds(from, source, amount));
        }
        if destination.checked_add(amount).is_none() {
            return Err(LedgerError::balance_overflow(to));
        }

        tx.execute(
            "UPDATE account SET balance = balance - ?1 WHERE number = ?2",
            params![amount, from],
        )?;
        tx.execute(
            "UPDATE account SET balance = balance + ?1 WHERE number = ?2",
            params![amount, to],
        )?;
        tx.commit()?;

        Ok(())
    }
}

impl LedgerStore for SqliteLedger {
    fn create_account(&mut self, number: &str, pin: &str) -> Result<Account, LedgerError> {
        let result = self.conn.execute(
            "INSERT INTO account (number, pin) VALUES (?1, ?2)",
            params![number, pin],
        );

        match result {
            Ok(_) => {
                info!(number, "account created");
                Ok(Account::new(number, pin))
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(LedgerError::duplicate_account(number))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_credentials(&self, number: &str, pin: &str) -> Result<Account, LedgerError> {
        self.conn
            .query_row(
                "SELECT number, pin, balance FROM account WHERE number = ?1 AND pin = ?2",
                params![number, pin],
                Self::account_from_row,
            )
            .optional()?
            .ok_or(LedgerError::InvalidCredentials)
    }

    fn find_by_number(&self, number: &str) -> Result<Account, LedgerError> {
        debug!(number, "looking up account");
        self.conn
            .query_row(
                "SELECT number, pin, balance FROM account WHERE number = ?1",
                params![number],
                Self::account_from_row,
            )
            .optional()?
            .ok_or_else(|| LedgerError::account_not_found(number))
    }

    fn add_income(&mut self, number: &str, amount: Balance) -> Result<Account, LedgerError> {
        if amount < 0 {
            warn!(number, amount, "rejected negative income");
            return Err(LedgerError::InvalidAmount { amount });
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = Self::balance_of(&tx, number)?
            .ok_or_else(|| LedgerError::account_not_found(number))?;
        let balance = current
            .checked_add(amount)
            .ok_or_else(|| LedgerError::balance_overflow(number))?;

        tx.execute(
            "UPDATE account SET balance = ?1 WHERE number = ?2",
            params![balance, number],
        )?;
        let account = tx.query_row(
            "SELECT number, pin, balance FROM account WHERE number = ?1",
            params![number],
            Self::account_from_row,
        )?;
        tx.commit()?;
        info!(number, amount, "income added");

        Ok(account)
    }

    fn apply_transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        check_transfer_request(from, to, amount)?;

        // Dropping the transaction on any early return rolls it back
        match self.transfer_in_transaction(from, to, amount) {
            Ok(()) => {
                info!(from, to, amount, "transfer completed");
                Ok(())
            }
            Err(e @ LedgerError::StorageFailure { .. }) => {
                error!(from, to, amount, error = %e, "transfer rolled back");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn close_account(&mut self, number: &str, pin: &str) -> Result<(), LedgerError> {
        let deleted = self.conn.execute(
            "DELETE FROM account WHERE number = ?1 AND pin = ?2",
            params![number, pin],
        )?;

        if deleted == 0 {
            return Err(LedgerError::InvalidCredentials);
        }
        info!(number, "account closed");

        Ok(())
    }

    fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let mut stmt = self
            .conn
            .prepare("SELECT number, pin, balance FROM account ORDER BY number")?;
        let accounts = stmt
            .query_map([], Self::account_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(accounts)
    }
}
