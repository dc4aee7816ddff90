//! Terminal session
//!
//! Drives the numbered menus over any `BufRead`/`Write` pair, one line of
//! input per prompt and exactly one ledger operation per command.
//!
//! The session remembers only the logged-in card number and PIN. Balances
//! are always read back from the store, never cached between commands.

use crate::core::{Bank, LedgerStore};
use crate::types::{Balance, LedgerError};
use rand::Rng;
use std::io::{BufRead, Write};
use tracing::{error, info, warn};

const MAIN_MENU: &str = "1. Create an account\n2. Log into account\n0. Exit";
const ACCOUNT_MENU: &str =
    "1. Balance\n2. Add income\n3. Do transfer\n4. Close account\n5. Log out\n0. Exit";

const WRONG_OPTION: &str = "Wrong option!";
const WRONG_CREDENTIALS: &str = "Wrong card number or PIN!";
const INVALID_AMOUNT: &str = "Invalid amount!";
const OPERATION_FAILED: &str = "Operation failed, please try again.";
const BYE: &str = "Bye!";

/// What the main loop should do after an account-menu command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Stay,
    LoggedOut,
    Exit,
}

/// Credentials of the logged-in card
struct Credentials {
    number: String,
    pin: String,
}

/// Interactive menu session over a bank
pub struct Session<'a, S: LedgerStore, R: Rng, I: BufRead, O: Write> {
    bank: &'a mut Bank<S, R>,
    input: I,
    output: O,
}

impl<'a, S: LedgerStore, R: Rng, I: BufRead, O: Write> Session<'a, S, R, I, O> {
    /// Create a session reading commands from `input` and writing to `output`
    pub fn new(bank: &'a mut Bank<S, R>, input: I, output: O) -> Self {
        Session {
            bank,
            input,
            output,
        }
    }

    /// Run the main menu until the user exits or input ends
    ///
    /// # Errors
    ///
    /// Only I/O failures on `input` or `output` are returned. Ledger errors
    /// are reported to the user and the menu is shown again.
    pub fn run(mut self) -> Result<(), LedgerError> {
        loop {
            writeln!(self.output, "{}", MAIN_MENU)?;

            let Some(choice) = self.read_line()? else {
                break;
            };

            match choice.as_str() {
                "1" => self.create_account()?,
                "2" => {
                    if self.log_in()? == Flow::Exit {
                        break;
                    }
                }
                "0" => break,
                _ => writeln!(self.output, "{}", WRONG_OPTION)?,
            }
        }

        writeln!(self.output, "\n{}", BYE)?;
        self.output.flush()?;
        Ok(())
    }

    /// Read one trimmed line, `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>, LedgerError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Print a prompt and read the answer
    fn prompt(&mut self, text: &str) -> Result<Option<String>, LedgerError> {
        writeln!(self.output, "{}", text)?;
        self.output.flush()?;
        self.read_line()
    }

    fn prompt_amount(&mut self, text: &str) -> Result<Option<Balance>, LedgerError> {
        let Some(answer) = self.prompt(text)? else {
            return Ok(None);
        };

        match answer.parse::<Balance>() {
            Ok(amount) => Ok(Some(amount)),
            Err(_) => {
                writeln!(self.output, "{}", INVALID_AMOUNT)?;
                Ok(None)
            }
        }
    }

    fn create_account(&mut self) -> Result<(), LedgerError> {
        match self.bank.open_account() {
            Ok(account) => {
                writeln!(self.output, "\nYour card has been created")?;
                writeln!(self.output, "Your card number:\n{}", account.number)?;
                writeln!(self.output, "Your card PIN:\n{}\n", account.pin)?;
            }
            Err(e) => self.report_failure(&e)?,
        }
        Ok(())
    }

    fn log_in(&mut self) -> Result<Flow, LedgerError> {
        let Some(number) = self.prompt("\nEnter your card number:")? else {
            return Ok(Flow::Exit);
        };
        let Some(pin) = self.prompt("Enter your PIN:")? else {
            return Ok(Flow::Exit);
        };

        match self.bank.log_in(&number, &pin) {
            Ok(_) => {
                info!(number = %number, "logged in");
                writeln!(self.output, "\nYou have successfully logged in!\n")?;
            }
            Err(LedgerError::InvalidCredentials) => {
                writeln!(self.output, "\n{}\n", WRONG_CREDENTIALS)?;
                return Ok(Flow::LoggedOut);
            }
            Err(e) => {
                self.report_failure(&e)?;
                return Ok(Flow::LoggedOut);
            }
        }

        self.account_menu(Credentials { number, pin })
    }

    fn account_menu(&mut self, card: Credentials) -> Result<Flow, LedgerError> {
        loop {
            writeln!(self.output, "{}", ACCOUNT_MENU)?;

            let Some(choice) = self.read_line()? else {
                return Ok(Flow::Exit);
            };

            let flow = match choice.as_str() {
                "1" => self.show_balance(&card)?,
                "2" => self.add_income(&card)?,
                "3" => self.do_transfer(&card)?,
                "4" => self.close_account(&card)?,
                "5" => {
                    writeln!(self.output, "\nYou have successfully logged out!\n")?;
                    Flow::LoggedOut
                }
                "0" => Flow::Exit,
                _ => {
                    writeln!(self.output, "{}", WRONG_OPTION)?;
                    Flow::Stay
                }
            };

            if flow != Flow::Stay {
                return Ok(flow);
            }
        }
    }

    fn show_balance(&mut self, card: &Credentials) -> Result<Flow, LedgerError> {
        match self.bank.balance(&card.number, &card.pin) {
            Ok(balance) => {
                writeln!(self.output, "\nBalance: {}\n", balance)?;
                Ok(Flow::Stay)
            }
            Err(e) => self.handle_error(&e),
        }
    }

    fn add_income(&mut self, card: &Credentials) -> Result<Flow, LedgerError> {
        let Some(amount) = self.prompt_amount("\nEnter income:")? else {
            return Ok(Flow::Stay);
        };

        match self.bank.add_income(&card.number, amount) {
            Ok(_) => {
                writeln!(self.output, "Income was added!\n")?;
                Ok(Flow::Stay)
            }
            Err(e) => self.handle_error(&e),
        }
    }

    fn do_transfer(&mut self, card: &Credentials) -> Result<Flow, LedgerError> {
        let Some(destination) = self.prompt("\nTransfer\nEnter card number:")? else {
            return Ok(Flow::Stay);
        };

        // Reject a bad destination before asking for the amount
        if let Err(e) = self.bank.check_destination(&card.number, &destination) {
            return self.handle_error(&e);
        }

        let Some(amount) = self.prompt_amount("Enter how much money you want to transfer:")? else {
            return Ok(Flow::Stay);
        };

        match self.bank.transfer(&card.number, &destination, amount) {
            Ok(()) => {
                writeln!(self.output, "Success!\n")?;
                Ok(Flow::Stay)
            }
            Err(e) => self.handle_error(&e),
        }
    }

    fn close_account(&mut self, card: &Credentials) -> Result<Flow, LedgerError> {
        match self.bank.close_account(&card.number, &card.pin) {
            Ok(()) => {
                writeln!(self.output, "\nThe account has been closed!\n")?;
                Ok(Flow::LoggedOut)
            }
            Err(e) => self.handle_error(&e),
        }
    }

    /// Print the user-facing message for a failed account operation
    fn handle_error(&mut self, error: &LedgerError) -> Result<Flow, LedgerError> {
        let message = match error {
            LedgerError::SameAccount => "You can't transfer money to the same account!",
            LedgerError::InvalidDestinationFormat { .. } => {
                "Probably you made a mistake in the card number. Please try again!"
            }
            LedgerError::DestinationNotFound { .. } => "Such a card does not exist.",
            LedgerError::InsufficientFunds { .. } => "Not enough money!",
            LedgerError::InvalidAmount { .. } => INVALID_AMOUNT,
            LedgerError::InvalidCredentials | LedgerError::AccountNotFound { .. } => {
                // The logged-in card is gone, so is the session
                writeln!(self.output, "\n{}\n", WRONG_CREDENTIALS)?;
                return Ok(Flow::LoggedOut);
            }
            other => {
                self.report_failure(other)?;
                return Ok(Flow::Stay);
            }
        };

        writeln!(self.output, "{}\n", message)?;
        Ok(Flow::Stay)
    }

    fn report_failure(&mut self, error: &LedgerError) -> Result<(), LedgerError> {
        if error.is_rejection() {
            warn!(error = %error, "ledger operation rejected");
        } else {
            error!(error = %error, "ledger operation failed");
        }
        writeln!(self.output, "{}\n", OPERATION_FAILED)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLedger;
    use crate::types::Account;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    const A: &str = "4000000000000002";
    const B: &str = "4000001234567899";

    fn bank_with_accounts() -> Bank<MemoryLedger, StdRng> {
        let mut store = MemoryLedger::new();
        store.create_account(A, "1111").unwrap();
        store.create_account(B, "2222").unwrap();
        Bank::with_rng(store, StdRng::seed_from_u64(11))
    }

    /// Run a scripted session and return everything it printed
    fn run_script<S: LedgerStore>(bank: &mut Bank<S, StdRng>, script: &str) -> String {
        let mut output = Vec::new();
        Session::new(bank, Cursor::new(script.to_string()), &mut output)
            .run()
            .expect("Session failed");
        String::from_utf8(output).unwrap()
    }

    /// Ledger whose balance writes always fail at the storage layer
    struct BrokenWrites {
        inner: MemoryLedger,
    }

    impl LedgerStore for BrokenWrites {
        fn create_account(&mut self, number: &str, pin: &str) -> Result<Account, LedgerError> {
            self.inner.create_account(number, pin)
        }
        fn find_by_credentials(&self, number: &str, pin: &str) -> Result<Account, LedgerError> {
            self.inner.find_by_credentials(number, pin)
        }
        fn find_by_number(&self, number: &str) -> Result<Account, LedgerError> {
            self.inner.find_by_number(number)
        }
        fn add_income(&mut self, _: &str, _: Balance) -> Result<Account, LedgerError> {
            Err(LedgerError::storage_failure("disk I/O error"))
        }
        fn apply_transfer(&mut self, _: &str, _: &str, _: Balance) -> Result<(), LedgerError> {
            Err(LedgerError::storage_failure("disk I/O error"))
        }
        fn close_account(&mut self, number: &str, pin: &str) -> Result<(), LedgerError> {
            self.inner.close_account(number, pin)
        }
        fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
            self.inner.accounts()
        }
    }

    #[test]
    fn test_exit_immediately() {
        let mut bank = bank_with_accounts();
        let output = run_script(&mut bank, "0\n");
        assert!(output.starts_with(MAIN_MENU));
        assert!(output.ends_with("\nBye!\n"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let mut bank = bank_with_accounts();
        let output = run_script(&mut bank, "");
        assert!(output.contains(BYE));
    }

    #[test]
    fn test_wrong_option() {
        let mut bank = bank_with_accounts();
        let output = run_script(&mut bank, "7\n0\n");
        assert!(output.contains(WRONG_OPTION));
    }

    #[test]
    fn test_create_account_prints_card() {
        let mut bank = bank_with_accounts();
        let output = run_script(&mut bank, "1\n0\n");

        assert!(output.contains("Your card has been created"));
        let number = output
            .lines()
            .skip_while(|line| *line != "Your card number:")
            .nth(1)
            .unwrap();
        assert!(number.starts_with("400000"));
        assert!(crate::core::luhn::validate(number));
        assert_eq!(bank.store().len(), 3);
    }

    #[test]
    fn test_wrong_credentials() {
        let mut bank = bank_with_accounts();
        let output = run_script(&mut bank, &format!("2\n{A}\n9999\n0\n"));
        assert!(output.contains(WRONG_CREDENTIALS));
        assert!(!output.contains("logged in"));
    }

    #[test]
    fn test_income_then_balance() {
        let mut bank = bank_with_accounts();
        let output = run_script(&mut bank, &format!("2\n{A}\n1111\n2\n10000\n2\n15000\n1\n0\n"));

        assert!(output.contains("You have successfully logged in!"));
        assert!(output.contains("Income was added!"));
        assert!(output.contains("Balance: 25000"));
        assert_eq!(bank.store().find_by_number(A).unwrap().balance, 25_000);
    }

    #[test]
    fn test_negative_income_rejected() {
        let mut bank = bank_with_accounts();
        let output = run_script(&mut bank, &format!("2\n{A}\n1111\n2\n-5\n0\n"));
        assert!(output.contains(INVALID_AMOUNT));
        assert_eq!(bank.store().find_by_number(A).unwrap().balance, 0);
    }

    #[test]
    fn test_unparseable_income_rejected() {
        let mut bank = bank_with_accounts();
        let output = run_script(&mut bank, &format!("2\n{A}\n1111\n2\nlots\n1\n0\n"));
        assert!(output.contains(INVALID_AMOUNT));
        assert!(output.contains("Balance: 0"));
    }

    #[test]
    fn test_transfer_dialogue() {
        let mut bank = bank_with_accounts();
        let script = format!(
            "2\n{A}\n1111\n\
             3\n{A}\n\
             3\n2000007269641764\n\
             3\n2000007269641768\n\
             3\n{B}\n100000\n\
             2\n20000\n\
             3\n{B}\n10000\n\
             0\n"
        );
        let output = run_script(&mut bank, &script);

        assert!(output.contains("You can't transfer money to the same account!"));
        assert!(output.contains("Probably you made a mistake in the card number."));
        assert!(output.contains("Such a card does not exist."));
        assert!(output.contains("Not enough money!"));
        assert!(output.contains("Success!"));
        assert_eq!(bank.store().find_by_number(A).unwrap().balance, 10_000);
        assert_eq!(bank.store().find_by_number(B).unwrap().balance, 10_000);
    }

    #[test]
    fn test_bad_destination_does_not_ask_amount() {
        let mut bank = bank_with_accounts();
        let output = run_script(&mut bank, &format!("2\n{A}\n1111\n3\n2000007269641764\n0\n"));
        assert!(!output.contains("Enter how much money"));
    }

    #[test]
    fn test_close_account_logs_out() {
        let mut bank = bank_with_accounts();
        let output = run_script(&mut bank, &format!("2\n{A}\n1111\n4\n2\n{A}\n1111\n0\n"));

        assert!(output.contains("The account has been closed!"));
        assert!(output.contains(WRONG_CREDENTIALS));
        assert!(bank.store().find_by_number(A).is_err());
    }

    #[test]
    fn test_storage_failure_keeps_menu_running() {
        let mut inner = MemoryLedger::new();
        inner.create_account(A, "1111").unwrap();
        inner.create_account(B, "2222").unwrap();
        let mut bank = Bank::with_rng(BrokenWrites { inner }, StdRng::seed_from_u64(11));

        let output = run_script(&mut bank, &format!("2\n{A}\n1111\n2\n500\n3\n{B}\n0\n1\n0\n"));

        assert_eq!(output.matches(OPERATION_FAILED).count(), 2);
        assert!(!output.contains("Income was added!"));
        assert!(!output.contains("Success!"));
        // Shown after login, after each failure and after the balance
        assert_eq!(output.matches(ACCOUNT_MENU).count(), 4);
        assert!(output.contains("Balance: 0"));
        assert!(output.ends_with("\nBye!\n"));
        assert_eq!(bank.store().find_by_number(A).unwrap().balance, 0);
        assert_eq!(bank.store().find_by_number(B).unwrap().balance, 0);
    }

    #[test]
    fn test_log_out_returns_to_main_menu() {
        let mut bank = bank_with_accounts();
        let output = run_script(&mut bank, &format!("2\n{A}\n1111\n5\n0\n"));

        assert!(output.contains("You have successfully logged out!"));
        assert_eq!(output.matches(MAIN_MENU).count(), 2);
    }

    #[test]
    fn test_exit_from_account_menu() {
        let mut bank = bank_with_accounts();
        let output = run_script(&mut bank, &format!("2\n{A}\n1111\n0\n"));

        assert!(output.ends_with("\nBye!\n"));
        assert_eq!(output.matches(MAIN_MENU).count(), 1);
    }
}
