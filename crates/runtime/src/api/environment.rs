//! World collaborator consumed by the runtime.
//!
//! Terrain generation, entity placement, predator movement and rendering live
//! behind [`Environment`]. The runtime only reads the current layout, hands
//! over one action per step, and asks where to respawn.
use std::fmt;

use agent_core::{Action, EntityLayout, Position, TerrainOracle};

/// What happened when the environment applied one agent action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// Agent position after the move; unchanged when the move was blocked.
    pub position: Position,
    /// The agent stood on food after moving and consumed it.
    pub ate_food: bool,
    /// A predator shares the agent's cell after predators moved.
    pub predator_hit: bool,
}

impl StepOutcome {
    pub fn stayed(position: Position) -> Self {
        Self {
            position,
            ate_food: false,
            predator_hit: false,
        }
    }
}

/// Why the agent lost a life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathCause {
    Predator,
    Starvation,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeathCause::Predator => "a predator",
            DeathCause::Starvation => "starvation",
        };
        write!(f, "{}", label)
    }
}

/// The simulated island as seen by the runtime.
pub trait Environment {
    fn terrain(&self) -> &dyn TerrainOracle;

    fn entities(&self) -> &EntityLayout;

    /// Moves the agent (if the destination is free), resolves eating, then
    /// advances predators.
    fn apply(&mut self, agent: Position, action: Action) -> StepOutcome;

    /// A free land cell for a fresh life.
    fn respawn_point(&mut self) -> Position;

    /// Builds a new island for the next episode.
    fn regenerate(&mut self) {}
}
