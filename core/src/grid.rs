//! Tokenizer and the immutable token grid it produces.

use std::iter;
use std::sync::Arc;

use piwalk_types::{Digit, EMPTY_TOKEN, Position, Token};

/// Characters that can stand alone as an operator cell.
pub const OPERATORS: &str = "PpE^v+-@|<>:.=";

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '@' | '[' | ']')
}

/// Ragged rows of tokens. Lookups outside the source resolve to the shared
/// empty token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Token>>,
    width: usize,
}

impl Grid {
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let rows: Vec<Vec<Token>> = source
            .replace('\r', "")
            .split('\n')
            .map(|line| tokenize_line(line.trim_end_matches([' ', '\t'])))
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width }
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> &Token {
        let (Ok(x), Ok(y)) = (usize::try_from(pos.x), usize::try_from(pos.y)) else {
            return &EMPTY_TOKEN;
        };
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .unwrap_or(&EMPTY_TOKEN)
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Token>] {
        &self.rows
    }

    /// Length of the longest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

fn tokenize_line(line: &str) -> Vec<Token> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == ' ' {
            tokens.push(Token::Empty);
        } else if let Some(digit) = Digit::from_char(ch) {
            tokens.push(Token::Path(digit));
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            // Letters that double as opcodes only count as operators when
            // they stand alone.
            let standalone = matches!(chars.get(i + 1), None | Some(' ' | '|'));
            if standalone && OPERATORS.contains(ch) {
                tokens.push(Token::Operator(ch));
            } else {
                let start = i;
                while i + 1 < chars.len() && is_name_char(chars[i + 1]) {
                    i += 1;
                }
                let text: String = chars[start..=i].iter().collect();
                let token = Token::Name(Arc::from(text));
                tokens.extend(iter::repeat_n(token, i + 1 - start));
            }
        } else if OPERATORS.contains(ch) {
            tokens.push(Token::Operator(ch));
        } else {
            tokens.push(Token::Unknown(ch));
        }

        i += 1;
    }

    tokens
}
