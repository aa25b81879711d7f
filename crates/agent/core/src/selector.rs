//! Epsilon-greedy action selection over biased, masked action values.

use rand::Rng;

use crate::action::{Action, ActionSet, ActionValues};

/// Picks one action per decision step.
///
/// With probability `epsilon` a valid action is drawn uniformly; otherwise the
/// valid action with the highest `value + bias` wins. Ties resolve to the
/// earliest action in [`Action::ALL`], and an invalid action is never returned.
pub struct ActionSelector;

impl ActionSelector {
    pub fn choose<R: Rng + ?Sized>(
        values: &ActionValues,
        bias: Option<&ActionValues>,
        validity: ActionSet,
        epsilon: f64,
        rng: &mut R,
    ) -> Action {
        if rng.random::<f64>() < epsilon {
            let action = Self::explore(validity, rng);
            tracing::debug!(%action, epsilon, "explore");
            return action;
        }

        let action = Self::greedy(values, bias, validity);
        tracing::debug!(%action, "exploit");
        action
    }

    /// Uniform draw among valid actions.
    pub fn explore<R: Rng + ?Sized>(validity: ActionSet, rng: &mut R) -> Action {
        let options: Vec<Action> = validity.with(Action::Stay).actions().collect();
        let pick = rng.random_range(0..options.len());
        options.get(pick).copied().unwrap_or(Action::Stay)
    }

    /// Highest `value + bias` among valid actions; first occurrence wins ties.
    pub fn greedy(values: &ActionValues, bias: Option<&ActionValues>, validity: ActionSet) -> Action {
        let mut best = Action::Stay;
        let mut best_score = f64::NEG_INFINITY;

        for action in validity.with(Action::Stay).actions() {
            let idx = action.index();
            let score = values[idx] + bias.map_or(0.0, |bias| bias[idx]);
            if score > best_score {
                best = action;
                best_score = score;
            }
        }

        best
    }
}
