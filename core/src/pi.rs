//! The π-digit reference string and the reversible index walking it.

use std::sync::Arc;

use piwalk_types::Digit;
use thiserror::Error;

/// First 10 000 digits of π, without the decimal point.
const BUILTIN_DIGITS: &str = include_str!("pi_digits.txt");

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pi reference contains no digits")]
pub struct PiDigitsError;

/// Immutable reference string that drives navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiDigits(Arc<[u8]>);

impl PiDigits {
    /// Wrap a reference string. Surrounding whitespace is ignored; interior
    /// non-digit characters are kept and act as dead ends when reached.
    pub fn new(text: &str) -> Result<Self, PiDigitsError> {
        let trimmed = text.trim();
        if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
            return Err(PiDigitsError);
        }
        Ok(Self(Arc::from(trimmed.as_bytes())))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Digit at `index`, or `None` when out of range or not a digit.
    #[must_use]
    pub fn get(&self, index: i64) -> Option<Digit> {
        let index = usize::try_from(index).ok()?;
        self.0
            .get(index)
            .and_then(|&b| Digit::from_char(char::from(b)))
    }
}

impl Default for PiDigits {
    fn default() -> Self {
        Self(Arc::from(BUILTIN_DIGITS.trim().as_bytes()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PiVelocity {
    #[default]
    Forward,
    Backward,
}

impl PiVelocity {
    #[must_use]
    pub const fn step(self) -> i64 {
        match self {
            PiVelocity::Forward => 1,
            PiVelocity::Backward => -1,
        }
    }

    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            PiVelocity::Forward => PiVelocity::Backward,
            PiVelocity::Backward => PiVelocity::Forward,
        }
    }
}

/// Position and travel direction over [`PiDigits`].
///
/// Starts on the leading `3` moving forward, so the first advance lands on `1`.
#[derive(Debug, Clone)]
pub struct PiIndex {
    digits: PiDigits,
    index: i64,
    velocity: PiVelocity,
}

impl PiIndex {
    #[must_use]
    pub fn new(digits: PiDigits) -> Self {
        Self {
            digits,
            index: 0,
            velocity: PiVelocity::Forward,
        }
    }

    #[must_use]
    pub fn index(&self) -> i64 {
        self.index
    }

    #[must_use]
    pub fn velocity(&self) -> PiVelocity {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: PiVelocity) {
        self.velocity = velocity;
    }

    pub fn reverse(&mut self) {
        self.velocity = self.velocity.reversed();
    }

    /// Move one step by the current velocity and return the digit landed on.
    pub fn advance(&mut self) -> Option<Digit> {
        self.index = self.index.saturating_add(self.velocity.step());
        self.digit()
    }

    #[must_use]
    pub fn digit(&self) -> Option<Digit> {
        self.digits.get(self.index)
    }

    #[must_use]
    pub fn digit_at(&self, offset: i64) -> Option<Digit> {
        self.digits.get(self.index.saturating_add(offset))
    }

    /// Digit consumed by the previous advance (the cell the cursor now sits on).
    #[must_use]
    pub fn previous_digit(&self) -> Option<Digit> {
        self.digit_at(-self.velocity.step())
    }

    #[must_use]
    pub fn digits(&self) -> &PiDigits {
        &self.digits
    }
}

#[cfg(test)]
mod tests {
    use piwalk_types::Digit;

    use super::{PiDigits, PiIndex, PiVelocity};

    fn digit(value: u8) -> Digit {
        Digit::new(value).expect("test fixture must be a digit")
    }

    #[test]
    fn builtin_digits_start_with_pi() {
        let digits = PiDigits::default();
        assert_eq!(digits.len(), 10_000);
        let prefix: Vec<u8> = (0..8).filter_map(|i| digits.get(i)).map(Digit::value).collect();
        assert_eq!(prefix, vec![3, 1, 4, 1, 5, 9, 2, 6]);
    }

    #[test]
    fn new_rejects_text_without_digits() {
        assert!(PiDigits::new("  \n").is_err());
        assert!(PiDigits::new("3.14").is_ok());
    }

    #[test]
    fn non_digits_and_out_of_range_read_as_none() {
        let digits = PiDigits::new("3.14").expect("fixture has digits");
        assert_eq!(digits.get(0), Some(digit(3)));
        assert_eq!(digits.get(1), None);
        assert_eq!(digits.get(-1), None);
        assert_eq!(digits.get(4), None);
    }

    #[test]
    fn first_advance_reads_index_one() {
        let mut pi = PiIndex::new(PiDigits::default());
        assert_eq!(pi.advance(), Some(digit(1)));
        assert_eq!(pi.advance(), Some(digit(4)));
        assert_eq!(pi.previous_digit(), Some(digit(1)));
    }

    #[test]
    fn reversing_walks_back() {
        let mut pi = PiIndex::new(PiDigits::default());
        pi.advance();
        pi.advance();
        pi.reverse();
        assert_eq!(pi.velocity(), PiVelocity::Backward);
        assert_eq!(pi.advance(), Some(digit(1)));
        assert_eq!(pi.previous_digit(), Some(digit(4)));
        assert_eq!(pi.advance(), Some(digit(3)));
        assert_eq!(pi.advance(), None);
    }
}
