use std::fmt;
use std::sync::Arc;

use crate::Digit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Empty,
    Path,
    Name,
    Operator,
    Unknown,
}

impl TokenKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::Empty => "empty",
            TokenKind::Path => "path",
            TokenKind::Name => "name",
            TokenKind::Operator => "operator",
            TokenKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One grid cell.
///
/// A multi-column name is stored once per column it spans; every copy shares
/// the same text allocation and compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Empty,
    Path(Digit),
    Name(Arc<str>),
    Operator(char),
    Unknown(char),
}

/// Shared blank cell returned for every out-of-range lookup.
pub static EMPTY_TOKEN: Token = Token::Empty;

impl Token {
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Token::Empty => TokenKind::Empty,
            Token::Path(_) => TokenKind::Path,
            Token::Name(_) => TokenKind::Name,
            Token::Operator(_) => TokenKind::Operator,
            Token::Unknown(_) => TokenKind::Unknown,
        }
    }

    #[must_use]
    pub fn path_digit(&self) -> Option<Digit> {
        match self {
            Token::Path(digit) => Some(*digit),
            _ => None,
        }
    }

    #[must_use]
    pub fn operator(&self) -> Option<char> {
        match self {
            Token::Operator(op) => Some(*op),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&Arc<str>> {
        match self {
            Token::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Source text of the cell (the whole run for names).
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Token::Empty => " ".to_string(),
            Token::Path(digit) => digit.to_string(),
            Token::Name(name) => name.to_string(),
            Token::Operator(ch) | Token::Unknown(ch) => ch.to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind(), self.text())
    }
}
