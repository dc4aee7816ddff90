//! CSV export of the ledger
//!
//! Writes one row per account with columns `number,balance`. PINs are
//! never exported.

use crate::types::{Account, LedgerError};
use std::io::Write;

/// Write account balances in CSV format
///
/// Accounts are sorted by card number for deterministic output.
///
/// # Arguments
///
/// * `accounts` - Slice of accounts to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(LedgerError::Io)` if a write error occurred
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by(|a, b| a.number.cmp(&b.number));

    if sorted_accounts.is_empty() {
        // serialize() only emits the header alongside the first record
        writer.write_record(["number", "balance"])?;
    }
    for account in sorted_accounts {
        writer.serialize(account)?;
    }

    writer.flush()?;
    Ok(())
}
