//! Turns active advice rules into an additive per-action bias.

use crate::action::{Action, ActionValues};
use crate::config::AgentConfig;
use crate::env::{Nearest, WorldSnapshot};

use super::rule::{AdviceAction, AdviceRule};

/// Additive adjustment applied to action values before selection.
pub type BiasVector = ActionValues;

const PREDATOR_SCALE: f64 = 0.5;
const ROCK_SCALE: f64 = 0.4;
const FOOD_SCALE: f64 = 0.5;
const TREE_SCALE: f64 = 0.35;
const HEADING_BONUS: f64 = 1.2;
const HEADING_PENALTY: f64 = 0.4;

#[derive(Clone, Copy, Debug)]
pub struct BiasComposer {
    weight: f64,
}

impl BiasComposer {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.advice_weight)
    }

    /// Splits the total weight evenly across the rules whose condition holds
    /// and sums their biases.
    ///
    /// A distance-based rule with no target on the map keeps its share of the
    /// weight but adds nothing. Returns `None` when no condition holds.
    pub fn compose<'r>(
        &self,
        rules: impl IntoIterator<Item = &'r AdviceRule>,
        snapshot: &WorldSnapshot<'_>,
    ) -> Option<BiasVector> {
        let active: Vec<&AdviceRule> = rules
            .into_iter()
            .filter(|rule| rule.condition.holds(snapshot))
            .collect();
        if active.is_empty() {
            return None;
        }

        let partial = self.weight / active.len() as f64;
        let mut bias = [0.0; AgentConfig::ACTION_COUNT];
        for shape in active
            .iter()
            .filter_map(|rule| BiasShape::resolve(rule.action, snapshot))
        {
            for action in Action::ALL {
                bias[action.index()] += shape.bias(action, snapshot, partial);
            }
        }

        tracing::trace!(rules = active.len(), ?bias, "advice bias");
        Some(bias)
    }
}

/// A rule's action bound to the concrete target it refers to this tick.
enum BiasShape {
    Away { threat: Nearest, scale: f64 },
    Towards { goal: Nearest, scale: f64 },
    Heading(Action),
    Hold,
}

impl BiasShape {
    fn resolve(action: AdviceAction, snapshot: &WorldSnapshot<'_>) -> Option<Self> {
        let shape = match action {
            AdviceAction::AvoidPredator => BiasShape::Away {
                threat: snapshot.nearest_predator()?,
                scale: PREDATOR_SCALE,
            },
            AdviceAction::AvoidRocks => BiasShape::Away {
                threat: snapshot.nearest_rock()?,
                scale: ROCK_SCALE,
            },
            AdviceAction::SeekFood => BiasShape::Towards {
                goal: snapshot.nearest_food()?,
                scale: FOOD_SCALE,
            },
            AdviceAction::SeekTrees => BiasShape::Towards {
                goal: snapshot.nearest_tree()?,
                scale: TREE_SCALE,
            },
            AdviceAction::Stay => BiasShape::Hold,
            AdviceAction::Direction(direction) => BiasShape::Heading(direction.action()),
        };
        Some(shape)
    }

    fn bias(&self, action: Action, snapshot: &WorldSnapshot<'_>, weight: f64) -> f64 {
        let after = |target| f64::from(snapshot.agent.step(action).distance(target));
        match *self {
            BiasShape::Away { threat, scale } => {
                (after(threat.target) - f64::from(threat.distance)) * weight * scale
            }
            BiasShape::Towards { goal, scale } => {
                (f64::from(goal.distance) - after(goal.target)) * weight * scale
            }
            BiasShape::Heading(heading) if action == heading => weight * HEADING_BONUS,
            BiasShape::Heading(_) if action.is_move() => -weight * HEADING_PENALTY,
            BiasShape::Heading(_) => 0.0,
            BiasShape::Hold if action == Action::Stay => weight * HEADING_BONUS,
            BiasShape::Hold => 0.0,
        }
    }
}
