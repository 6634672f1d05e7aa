//! Cursor geometry: position, facing and the bounding box it lives in.

use piwalk_types::{Bounds, Direction, Position};

/// Receives cursor movement notifications.
///
/// The cursor owns its observer; callers reach it through
/// [`Cursor::observer`] and [`Cursor::observer_mut`].
pub trait CursorObserver {
    fn on_face(&mut self, _direction: Direction) {}
    fn on_advance(&mut self, _facing: Direction) {}
}

impl CursorObserver for () {}

/// Remembers the direction of the last completed move, so navigation can
/// refuse to step straight back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FacingTracker {
    last_faced: Option<Direction>,
}

impl FacingTracker {
    #[must_use]
    pub fn last_faced(&self) -> Option<Direction> {
        self.last_faced
    }

    /// Forget the last move; the next step may backtrack.
    pub fn clear(&mut self) {
        self.last_faced = None;
    }
}

impl CursorObserver for FacingTracker {
    fn on_advance(&mut self, facing: Direction) {
        self.last_faced = Some(facing);
    }
}

#[derive(Debug, Clone)]
pub struct Cursor<O = ()> {
    position: Position,
    facing: Direction,
    dx: i64,
    dy: i64,
    bounds: Bounds,
    observer: O,
}

impl<O: CursorObserver + Default> Default for Cursor<O> {
    fn default() -> Self {
        Self::new(O::default())
    }
}

impl<O: CursorObserver> Cursor<O> {
    /// Cursor at the origin facing east, inside the default bounds.
    pub fn new(observer: O) -> Self {
        let (dx, dy) = Direction::E.offset();
        Self {
            position: Position::ORIGIN,
            facing: Direction::E,
            dx,
            dy,
            bounds: Bounds::default(),
            observer,
        }
    }

    pub fn set_bounds(&mut self, a: Position, b: Position) {
        self.bounds = Bounds::from_corners(a, b);
        self.position = self.bounds.clamp(self.position).0;
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Current per-step offset `(dx, dy)`.
    #[must_use]
    pub fn velocity(&self) -> (i64, i64) {
        (self.dx, self.dy)
    }

    pub fn face(&mut self, direction: Direction) {
        self.observer.on_face(direction);
        self.facing = direction;
        (self.dx, self.dy) = direction.offset();
    }

    pub fn advance(&mut self) {
        self.observer.on_advance(self.facing);
        self.position = self.bounds.clamp(self.position.offset(self.dx, self.dy)).0;
    }

    /// Clamped cell at a relative offset, without moving. The flag reports
    /// whether the offset left the bounds.
    #[must_use]
    pub fn at(&self, dx: i64, dy: i64) -> (Position, bool) {
        self.bounds.clamp(self.position.offset(dx, dy))
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}
