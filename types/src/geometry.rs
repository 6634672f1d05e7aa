//! Hex-style movement over a clamped integer plane.
//!
//! Rows are offset so that each cell has six neighbours: four diagonals one
//! column and one row away, and two horizontal neighbours two columns away.
//!
//! ```text
//!   NW   NE
//! W   ()   E
//!   SW   SE
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Direction
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    NW,
    NE,
    SW,
    SE,
    W,
    E,
}

const DIRECTION_PARSE_VALUES: &[&str] = &["nw", "ne", "sw", "se", "w", "e"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid direction '{raw}'; expected one of: {:?}", DIRECTION_PARSE_VALUES)]
pub struct DirectionParseError {
    raw: String,
}

impl Direction {
    /// Fixed enumeration order. Candidate lists and tie-breaks rely on it.
    pub const ALL: [Direction; 6] = [
        Direction::NW,
        Direction::NE,
        Direction::SW,
        Direction::SE,
        Direction::W,
        Direction::E,
    ];

    /// Grid offset `(dx, dy)` of one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Direction::NW => (-1, -1),
            Direction::NE => (1, -1),
            Direction::SW => (-1, 1),
            Direction::SE => (1, 1),
            Direction::W => (-2, 0),
            Direction::E => (2, 0),
        }
    }

    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Direction::NW => Direction::SE,
            Direction::NE => Direction::SW,
            Direction::SW => Direction::NE,
            Direction::SE => Direction::NW,
            Direction::W => Direction::E,
            Direction::E => Direction::W,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::NW => "nw",
            Direction::NE => "ne",
            Direction::SW => "sw",
            Direction::SE => "se",
            Direction::W => "w",
            Direction::E => "e",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Direction::ALL
            .into_iter()
            .find(|dir| dir.as_str() == lower)
            .ok_or_else(|| DirectionParseError { raw: s.to_string() })
    }
}

// ============================================================================
// Position / Bounds
// ============================================================================

/// Zero-based grid position: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// The same cell as a 1-based coordinate for diagnostics.
    #[must_use]
    pub const fn to_grid_coord(self) -> GridCoord {
        GridCoord {
            row: self.y.saturating_add(1),
            column: self.x.saturating_add(1),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Inclusive bounding box every cursor position is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    min: Position,
    max: Position,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Position::new(0, 0),
            max: Position::new(100, 100),
        }
    }
}

impl Bounds {
    /// Build the box spanned by two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Position, b: Position) -> Self {
        Self {
            min: Position::new(a.x.min(b.x), a.y.min(b.y)),
            max: Position::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    #[must_use]
    pub const fn min(&self) -> Position {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Position {
        self.max
    }

    #[must_use]
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// Clamp `pos` into the box. The flag is `true` when clamping changed it.
    #[must_use]
    pub fn clamp(&self, pos: Position) -> (Position, bool) {
        let clamped = Position::new(
            pos.x.clamp(self.min.x, self.max.x),
            pos.y.clamp(self.min.y, self.max.y),
        );
        (clamped, clamped != pos)
    }
}

/// 1-based row/column of a source cell, as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub row: i64,
    pub column: i64,
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, column {}", self.row, self.column)
    }
}
