//! Luhn checksum
//!
//! `validate` is the single definition of a well-formed card number.
//! `check_digit` never computes the digit in closed form: it tries every
//! candidate against `validate`, so the two can never disagree.

/// Check a digit string against the Luhn predicate
///
/// Walking from the right, every second digit (starting with the one left
/// of the last digit) is doubled, with 9 subtracted when the result exceeds 9.
/// The number is valid when the total is a multiple of 10.
///
/// Returns false for the empty string or any non-digit character.
pub fn validate(number: &str) -> bool {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = number
        .bytes()
        .rev()
        .enumerate()
        .map(|(distance, b)| {
            let digit = u32::from(b - b'0');
            if distance % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

/// Find the digit that makes `payload + digit` pass `validate`
///
/// Returns `None` if the payload contains anything but ASCII digits.
pub fn check_digit(payload: &str) -> Option<u8> {
    if !payload.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut candidate = String::with_capacity(payload.len() + 1);
    (0..=9u8).find(|&digit| {
        candidate.clear();
        candidate.push_str(payload);
        candidate.push(char::from(b'0' + digit));
        validate(&candidate)
    })
}
