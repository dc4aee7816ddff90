//! Bank service
//!
//! This module provides the `Bank`, which pairs a `CardGenerator` with a
//! `LedgerStore`. It owns the account opening flow (generate, insert,
//! regenerate on collision) and forwards authenticated operations to the
//! store, which remains the only owner of balance state.

use crate::core::generator::CardGenerator;
use crate::core::LedgerStore;
use crate::types::{Account, Balance, LedgerError};
use rand::rngs::ThreadRng;
use rand::Rng;
use tracing::{debug, warn};

/// Upper bound on regenerations when a card number collides
pub const MAX_GENERATION_ATTEMPTS: usize = 32;

/// Account operations over a ledger store
pub struct Bank<S: LedgerStore, R: Rng = ThreadRng> {
    store: S,
    generator: CardGenerator,
    rng: R,
}

impl<S: LedgerStore> Bank<S> {
    /// Create a bank drawing card numbers from the thread-local RNG
    pub fn new(store: S) -> Self {
        Bank::with_rng(store, rand::thread_rng())
    }
}

impl<S: LedgerStore, R: Rng> Bank<S, R> {
    /// Create a bank with an explicit random source
    pub fn with_rng(store: S, rng: R) -> Self {
        Bank {
            store,
            generator: CardGenerator::new(),
            rng,
        }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a new account with a fresh card number and PIN
    ///
    /// Collisions are retried silently up to `MAX_GENERATION_ATTEMPTS`
    /// times. Any other store error aborts immediately.
    ///
    /// # Returns
    ///
    /// The new account, balance 0
    pub fn open_account(&mut self) -> Result<Account, LedgerError> {
        let mut last_error = None;

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let number = self.generator.generate_number(&mut self.rng);
            let pin = self.generator.generate_pin(&mut self.rng);

            match self.store.create_account(&number, &pin) {
                Ok(account) => return Ok(account),
                Err(e @ LedgerError::DuplicateAccount { .. }) => {
                    debug!(attempt, number = %number, "card number collision, regenerating");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = MAX_GENERATION_ATTEMPTS,
            "gave up generating a unique card number"
        );
        Err(last_error.unwrap_or_else(|| LedgerError::storage_failure("no card number generated")))
    }

    /// Authenticate with card number and PIN
    pub fn log_in(&self, number: &str, pin: &str) -> Result<Account, LedgerError> {
        self.store.find_by_credentials(number, pin)
    }

    /// Current balance, always re-read from the store
    pub fn balance(&self, number: &str, pin: &str) -> Result<Balance, LedgerError> {
        Ok(self.store.find_by_credentials(number, pin)?.balance)
    }

    /// Credit income to an account
    pub fn add_income(&mut self, number: &str, amount: Balance) -> Result<Account, LedgerError> {
        self.store.add_income(number, amount)
    }

    /// Check that a destination can receive a transfer from `from`
    ///
    /// Runs the first three transfer preconditions (same account, Luhn,
    /// existence) so that the session can reject a bad destination before
    /// asking for an amount. `transfer` repeats them.
    pub fn check_destination(&self, from: &str, to: &str) -> Result<Account, LedgerError> {
        self.store.resolve_destination(from, to)
    }

    /// Transfer funds between two accounts
    pub fn transfer(&mut self, from: &str, to: &str, amount: Balance) -> Result<(), LedgerError> {
        self.store.transfer(from, to, amount)
    }

    /// Close an account; both number and PIN must match
    pub fn close_account(&mut self, number: &str, pin: &str) -> Result<(), LedgerError> {
        self.store.close_account(number, pin)
    }

    /// All accounts ordered by card number
    pub fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        self.store.accounts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::{CARD_NUMBER_LEN, ISSUER_PREFIX};
    use crate::core::luhn;
    use crate::store::MemoryLedger;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_bank(seed: u64) -> Bank<MemoryLedger, StdRng> {
        Bank::with_rng(MemoryLedger::new(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_open_account_produces_valid_card() {
        let mut bank = seeded_bank(1);

        let account = bank.open_account().unwrap();
        assert_eq!(account.number.len(), CARD_NUMBER_LEN);
        assert!(account.number.starts_with(ISSUER_PREFIX));
        assert!(luhn::validate(&account.number));
        assert_eq!(account.pin.len(), 4);
        assert_eq!(account.balance, 0);
        assert_eq!(bank.store().len(), 1);
    }

    #[test]
    fn test_open_account_regenerates_on_collision() {
        // Predict the first number the seeded RNG will produce and take it
        let generator = CardGenerator::new();
        let mut predictor = StdRng::seed_from_u64(5);
        let taken = generator.generate_number(&mut predictor);

        let mut store = MemoryLedger::new();
        store.create_account(&taken, "0000").unwrap();
        let mut bank = Bank::with_rng(store, StdRng::seed_from_u64(5));

        let account = bank.open_account().unwrap();
        assert_ne!(account.number, taken);
        assert_eq!(bank.store().len(), 2);
    }

    #[test]
    fn test_open_account_gives_up_after_max_attempts() {
        struct AlwaysTaken;

        impl LedgerStore for AlwaysTaken {
            fn create_account(&mut self, number: &str, _: &str) -> Result<Account, LedgerError> {
                Err(LedgerError::duplicate_account(number))
            }
            fn find_by_credentials(&self, _: &str, _: &str) -> Result<Account, LedgerError> {
                Err(LedgerError::InvalidCredentials)
            }
            fn find_by_number(&self, number: &str) -> Result<Account, LedgerError> {
                Err(LedgerError::account_not_found(number))
            }
            fn add_income(&mut self, number: &str, _: Balance) -> Result<Account, LedgerError> {
                Err(LedgerError::account_not_found(number))
            }
            fn apply_transfer(&mut self, _: &str, _: &str, _: Balance) -> Result<(), LedgerError> {
                Ok(())
            }
            fn close_account(&mut self, _: &str, _: &str) -> Result<(), LedgerError> {
                Err(LedgerError::InvalidCredentials)
            }
            fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
                Ok(Vec::new())
            }
        }

        let mut bank = Bank::with_rng(AlwaysTaken, StdRng::seed_from_u64(3));
        let result = bank.open_account();
        assert!(matches!(result, Err(LedgerError::DuplicateAccount { .. })));
    }

    #[test]
    fn test_balance_reflects_latest_income() {
        let mut bank = seeded_bank(2);
        let account = bank.open_account().unwrap();

        bank.add_income(&account.number, 500).unwrap();
        bank.add_income(&account.number, 250).unwrap();

        assert_eq!(bank.balance(&account.number, &account.pin).unwrap(), 750);
    }

    #[test]
    fn test_check_destination_order() {
        let mut bank = seeded_bank(4);
        let a = bank.open_account().unwrap();
        let b = bank.open_account().unwrap();

        assert_eq!(
            bank.check_destination(&a.number, &a.number),
            Err(LedgerError::SameAccount)
        );
        assert_eq!(
            bank.check_destination(&a.number, "2000007269641764"),
            Err(LedgerError::invalid_destination_format("2000007269641764"))
        );
        assert_eq!(
            bank.check_destination(&a.number, "2000007269641768"),
            Err(LedgerError::destination_not_found("2000007269641768"))
        );
        assert_eq!(bank.check_destination(&a.number, &b.number), Ok(b));
    }

    #[test]
    fn test_closed_account_cannot_log_in() {
        let mut bank = seeded_bank(6);
        let account = bank.open_account().unwrap();

        bank.close_account(&account.number, &account.pin).unwrap();
        assert_eq!(
            bank.log_in(&account.number, &account.pin),
            Err(LedgerError::InvalidCredentials)
        );
        assert!(bank.accounts().unwrap().is_empty());
    }
}
