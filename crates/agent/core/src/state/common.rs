use std::fmt;

use crate::action::Action;

/// Discrete grid position expressed in cell coordinates.
///
/// `y` grows downwards, so [`Action::Up`] decrements it.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two cells.
    #[inline]
    pub fn distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Cell reached by taking `action` from here, ignoring obstacles.
    #[inline]
    pub fn step(self, action: Action) -> Position {
        let (dx, dy) = action.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Logic step counter.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    /// Returns true when this tick lands on a multiple of `interval`.
    pub fn is_multiple_of(self, interval: u64) -> bool {
        interval != 0 && self.0 % interval == 0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
