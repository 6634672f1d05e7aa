//! Errors that abort a run.
//!
//! Navigation dead ends are not errors; they surface as
//! [`Tick::DeadEnd`](crate::Tick::DeadEnd) and [`RunOutcome::Crashed`](crate::RunOutcome::Crashed).

use std::fmt;

use piwalk_types::{GridCoord, Token};
use thiserror::Error;

use crate::store::ReadAbandoned;

/// Token shape an opcode required at some offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Name,
    NameOrEmpty,
    NameEmptyOrOperator,
    ThresholdOperator,
}

impl Expected {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Expected::Name => "name",
            Expected::NameOrEmpty => "name/empty",
            Expected::NameEmptyOrOperator => "name/empty/operator",
            Expected::ThresholdOperator => "</>/= operator",
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("expecting {expected} token at {at}, found {}", .found.kind())]
    Syntax {
        expected: Expected,
        found: Token,
        at: GridCoord,
    },
    #[error("program requested input but no input channel is connected")]
    InputUnavailable,
    #[error(transparent)]
    ReadAbandoned(#[from] ReadAbandoned),
}

impl RunError {
    /// Source cell the error points at, for syntax errors.
    #[must_use]
    pub fn location(&self) -> Option<GridCoord> {
        match self {
            RunError::Syntax { at, .. } => Some(*at),
            RunError::InputUnavailable | RunError::ReadAbandoned(_) => None,
        }
    }
}
