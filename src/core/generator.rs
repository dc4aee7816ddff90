//! Card number and PIN generation
//!
//! Numbers are the fixed issuer prefix, a uniformly random zero-padded
//! payload and a Luhn check digit. Uniqueness is not checked here: the
//! store rejects collisions and the caller regenerates.

use crate::core::luhn;
use crate::types::{CardNumber, Pin};
use rand::Rng;

/// Issuer identification prefix shared by every card
pub const ISSUER_PREFIX: &str = "400000";

/// Number of random digits between the prefix and the check digit
pub const PAYLOAD_DIGITS: usize = 9;

/// Number of digits in a PIN
pub const PIN_DIGITS: usize = 4;

/// Total length of a card number
pub const CARD_NUMBER_LEN: usize = 16;

const PAYLOAD_SPACE: u64 = 1_000_000_000;
const PIN_SPACE: u32 = 10_000;

/// Generates candidate card numbers and PINs
#[derive(Debug, Clone)]
pub struct CardGenerator {
    issuer_prefix: String,
}

impl CardGenerator {
    /// Create a generator for the default issuer prefix
    pub fn new() -> Self {
        CardGenerator {
            issuer_prefix: ISSUER_PREFIX.to_string(),
        }
    }

    /// Issuer prefix used for every generated number
    pub fn issuer_prefix(&self) -> &str {
        &self.issuer_prefix
    }

    /// Generate a Luhn-valid card number
    ///
    /// # Arguments
    ///
    /// * `rng` - Random source for the payload digits
    ///
    /// # Returns
    ///
    /// A 16-digit number starting with the issuer prefix
    pub fn generate_number<R: Rng + ?Sized>(&self, rng: &mut R) -> CardNumber {
        let payload = rng.gen_range(0..PAYLOAD_SPACE);
        let mut number = format!(
            "{}{:0width$}",
            self.issuer_prefix,
            payload,
            width = PAYLOAD_DIGITS
        );
        // prefix and payload are digits by construction
        let digit = luhn::check_digit(&number).unwrap_or_default();
        number.push(char::from(b'0' + digit));
        number
    }

    /// Generate a zero-padded 4-digit PIN
    pub fn generate_pin<R: Rng + ?Sized>(&self, rng: &mut R) -> Pin {
        format!("{:0width$}", rng.gen_range(0..PIN_SPACE), width = PIN_DIGITS)
    }
}

impl Default for CardGenerator {
    fn default() -> Self {
        Self::new()
    }
}
