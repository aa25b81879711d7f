//! Discrete agent actions and per-step validity masks.

use bitflags::bitflags;

use crate::config::AgentConfig;

/// One of the five moves available to the agent.
///
/// The declaration order is the tie-breaking order used by the selector and
/// the index order of every per-action array in this crate.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Action {
    Stay,
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    pub const ALL: [Action; AgentConfig::ACTION_COUNT] = [
        Action::Stay,
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
    ];

    /// Position within [`Action::ALL`] and every [`ActionValues`] array.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// Cell offset in screen coordinates (`y` grows downwards).
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Action::Stay => (0, 0),
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    pub const fn is_move(self) -> bool {
        !matches!(self, Action::Stay)
    }

    const fn flag(self) -> ActionSet {
        match self {
            Action::Stay => ActionSet::STAY,
            Action::Up => ActionSet::UP,
            Action::Down => ActionSet::DOWN,
            Action::Left => ActionSet::LEFT,
            Action::Right => ActionSet::RIGHT,
        }
    }
}

/// Per-action scalar, indexed by [`Action::index`].
pub type ActionValues = [f64; AgentConfig::ACTION_COUNT];

bitflags! {
    /// Set of actions; used as the validity mask for a decision step.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ActionSet: u8 {
        const STAY = 1 << 0;
        const UP = 1 << 1;
        const DOWN = 1 << 2;
        const LEFT = 1 << 3;
        const RIGHT = 1 << 4;
    }
}

impl ActionSet {
    /// Mask with only `stay` valid.
    pub const STAY_ONLY: Self = Self::STAY;

    /// Builds a validity mask from a passability predicate over the four moves.
    ///
    /// `stay` is always included.
    pub fn from_passable(mut passable: impl FnMut(Action) -> bool) -> Self {
        Action::ALL
            .into_iter()
            .filter(|&action| !action.is_move() || passable(action))
            .fold(Self::STAY, |set, action| set | action.flag())
    }

    #[inline]
    pub fn allows(self, action: Action) -> bool {
        self.contains(action.flag())
    }

    pub fn with(self, action: Action) -> Self {
        self | action.flag()
    }

    /// Allowed actions in selector order.
    pub fn actions(self) -> impl Iterator<Item = Action> {
        Action::ALL.into_iter().filter(move |&action| self.allows(action))
    }
}
