//! Navigation engine: one π digit, one cell per tick.
//!
//! Each tick advances the π index, collects the neighbouring path cells that
//! carry the new digit (in [`Direction::ALL`] order), drops the cell we just
//! came from, and settles any remaining ambiguity:
//!
//! 1. an installed [`BranchOverride`] gets the first say;
//! 2. a single candidate is taken as-is;
//! 3. a priority branch key takes the first candidate;
//! 4. otherwise the branch key's register picks one, modulo the candidate count.
//!
//! Running out of candidates is a [`Tick::DeadEnd`], not an error.

use std::fmt;

use piwalk_types::{Digit, Direction, EMPTY_TOKEN, Position, Token};

use crate::cursor::{Cursor, FacingTracker};
use crate::grid::Grid;
use crate::pi::{PiDigits, PiIndex, PiVelocity};
use crate::store::{StoreObserver, VariableStore};

/// External hook offered every non-empty candidate list.
pub trait BranchOverride: Send {
    /// Return a candidate to force it, or `None` to use the normal policy.
    fn choose(&mut self, candidates: &[Direction]) -> Option<Direction>;
}

impl<F> BranchOverride for F
where
    F: FnMut(&[Direction]) -> Option<Direction> + Send,
{
    fn choose(&mut self, candidates: &[Direction]) -> Option<Direction> {
        self(candidates)
    }
}

/// Branch keys that resolve ambiguity to the first candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityBranches(u16);

impl PriorityBranches {
    pub fn insert(&mut self, key: Digit) {
        self.0 |= 1 << key.value();
    }

    pub fn remove(&mut self, key: Digit) {
        self.0 &= !(1 << key.value());
    }

    #[must_use]
    pub fn contains(self, key: Digit) -> bool {
        self.0 & (1 << key.value()) != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Digit> {
        Digit::ALL.into_iter().filter(move |key| self.contains(*key))
    }
}

/// How a reversal opcode changes the π velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reversal {
    Toggle,
    Set(PiVelocity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Moved { direction: Direction, digit: Digit },
    DeadEnd(DeadEnd),
}

/// Where navigation stopped and which digit it could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadEnd {
    pub position: Position,
    pub digit: Option<Digit>,
}

impl fmt::Display for DeadEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coord = self.position.to_grid_coord();
        write!(f, "Crashed at ({},{}); could not find ", coord.column, coord.row)?;
        match self.digit {
            Some(digit) => write!(f, "{digit}"),
            None => f.write_str("a digit (end of pi reference)"),
        }
    }
}

/// Index into a candidate list chosen by a register value, using floored
/// modulo so negative values still land in range.
#[must_use]
pub fn tie_break_index(value: i64, count: usize) -> usize {
    let count = i64::try_from(count.max(1)).unwrap_or(i64::MAX);
    value.rem_euclid(count) as usize
}

pub struct Navigator {
    cursor: Cursor<FacingTracker>,
    pi: PiIndex,
    priority: PriorityBranches,
    branch_override: Option<Box<dyn BranchOverride>>,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("cursor", &self.cursor)
            .field("pi_index", &self.pi.index())
            .field("priority", &self.priority)
            .field("branch_override", &self.branch_override.is_some())
            .finish()
    }
}

impl Navigator {
    #[must_use]
    pub fn new(digits: PiDigits) -> Self {
        Self {
            cursor: Cursor::new(FacingTracker::default()),
            pi: PiIndex::new(digits),
            priority: PriorityBranches::default(),
            branch_override: None,
        }
    }

    pub fn set_branch_override(&mut self, hook: Option<Box<dyn BranchOverride>>) {
        self.branch_override = hook;
    }

    #[must_use]
    pub fn cursor(&self) -> &Cursor<FacingTracker> {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor<FacingTracker> {
        &mut self.cursor
    }

    #[must_use]
    pub fn pi(&self) -> &PiIndex {
        &self.pi
    }

    #[must_use]
    pub fn priority(&self) -> PriorityBranches {
        self.priority
    }

    pub fn priority_mut(&mut self) -> &mut PriorityBranches {
        &mut self.priority
    }

    #[must_use]
    pub fn last_faced(&self) -> Option<Direction> {
        self.cursor.observer().last_faced()
    }

    /// Token at a relative offset from the cursor; anything past the bounds
    /// reads as empty.
    #[must_use]
    pub fn lookup<'g>(&self, grid: &'g Grid, dx: i64, dy: i64) -> &'g Token {
        let (pos, clamped) = self.cursor.at(dx, dy);
        if clamped { &EMPTY_TOKEN } else { grid.get(pos) }
    }

    /// Neighbouring directions whose cell is a path carrying `digit`.
    #[must_use]
    pub fn candidates(&self, grid: &Grid, digit: Digit) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|dir| {
                let (dx, dy) = dir.offset();
                self.lookup(grid, dx, dy).path_digit() == Some(digit)
            })
            .collect()
    }

    /// Change π direction and allow the next tick to backtrack.
    pub fn request_reversal(&mut self, reversal: Reversal) {
        self.cursor.observer_mut().clear();
        match reversal {
            Reversal::Toggle => self.pi.reverse(),
            Reversal::Set(velocity) => self.pi.set_velocity(velocity),
        }
        tracing::trace!(velocity = ?self.pi.velocity(), "pi direction changed");
    }

    pub fn tick<O: StoreObserver>(&mut self, grid: &Grid, store: &mut VariableStore<O>) -> Tick {
        let position = self.cursor.position();
        let Some(digit) = self.pi.advance() else {
            tracing::debug!(index = self.pi.index(), "pi reference exhausted");
            return Tick::DeadEnd(DeadEnd {
                position,
                digit: None,
            });
        };
        let dead_end = Tick::DeadEnd(DeadEnd {
            position,
            digit: Some(digit),
        });

        let mut candidates = self.candidates(grid, digit);
        if candidates.is_empty() {
            tracing::debug!(%position, %digit, "no neighbour matches");
            return dead_end;
        }
        if let Some(last) = self.last_faced() {
            candidates.retain(|dir| *dir != last.reverse());
        }
        if candidates.is_empty() {
            tracing::debug!(%position, %digit, "only match is the cell we came from");
            return dead_end;
        }

        let direction = self.choose(&candidates, store);
        self.cursor.face(direction);
        self.cursor.advance();
        tracing::debug!(
            from = %position,
            to = %self.cursor.position(),
            %direction,
            %digit,
            "tick"
        );
        Tick::Moved { direction, digit }
    }

    fn choose<O: StoreObserver>(
        &mut self,
        candidates: &[Direction],
        store: &mut VariableStore<O>,
    ) -> Direction {
        if let Some(hook) = self.branch_override.as_mut()
            && let Some(forced) = hook.choose(candidates)
        {
            if candidates.contains(&forced) {
                return forced;
            }
            tracing::warn!(%forced, ?candidates, "branch override is not a candidate; ignored");
        }

        if candidates.len() == 1 {
            return candidates[0];
        }

        let branch_key = self.pi.previous_digit();
        if branch_key.is_some_and(|key| self.priority.contains(key)) {
            return candidates[0];
        }

        let key = branch_key.map_or(-1, i64::from);
        let value = store.register(key, None);
        let index = tie_break_index(value, candidates.len());
        tracing::trace!(?branch_key, value, index, ?candidates, "register tie-break");
        candidates[index]
    }
}
