use std::fmt;

use serde::{Deserialize, Serialize};

/// A single decimal digit, `0..=9`.
///
/// Path cells carry one, the π reference yields one per index, and registers
/// are keyed by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub const ALL: [Digit; 10] = [
        Digit(0),
        Digit(1),
        Digit(2),
        Digit(3),
        Digit(4),
        Digit(5),
        Digit(6),
        Digit(7),
        Digit(8),
        Digit(9),
    ];

    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 9 { Some(Self(value)) } else { None }
    }

    #[must_use]
    pub fn from_char(ch: char) -> Option<Self> {
        ch.to_digit(10).map(|d| Self(d as u8))
    }

    /// Interpret an arbitrary integer as a digit, if it is one.
    #[must_use]
    pub fn from_value(value: i64) -> Option<Self> {
        u8::try_from(value).ok().and_then(Self::new)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl From<Digit> for u8 {
    fn from(value: Digit) -> Self {
        value.0
    }
}

impl From<Digit> for i64 {
    fn from(value: Digit) -> Self {
        i64::from(value.0)
    }
}

impl TryFrom<u8> for Digit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("{value} is not a decimal digit"))
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
