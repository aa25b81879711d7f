//! Action-value estimators.
//!
//! Two interchangeable representations are supported: a Q-table indexed by the
//! three situation flags, and a small dense network over the continuous
//! features. Both learn from single transitions and are persisted as a
//! [`PolicyModel`].
mod exploration;
mod tabular;

pub use exploration::Exploration;
pub use tabular::QTable;

use rand::Rng;

use crate::action::{Action, ActionValues};
use crate::config::{AgentConfig, TerminalBootstrap};
use crate::error::ShapeError;
use crate::features::Observation;
use crate::network::{DenseNetwork, NetworkShape};

/// Selects the value-function representation.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PolicyKind {
    #[default]
    Network,
    Tabular,
}

impl PolicyKind {
    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::Network => "network",
            PolicyKind::Tabular => "tabular",
        }
    }
}

/// What follows the transition being learned from.
#[derive(Clone, Copy, Debug)]
pub enum NextState<'a> {
    Continue(&'a Observation),
    /// The agent died; `respawn` is the observation after respawning.
    Terminal { respawn: &'a Observation },
}

/// One `(s, a, r, s')` sample.
#[derive(Clone, Copy, Debug)]
pub struct Transition<'a> {
    pub observation: &'a Observation,
    pub action: Action,
    pub reward: f64,
    pub next: NextState<'a>,
}

/// Learned action-value function.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PolicyModel {
    Tabular(QTable),
    Network(DenseNetwork),
}

impl PolicyModel {
    pub fn network_shape(config: &AgentConfig) -> NetworkShape {
        NetworkShape::new(
            AgentConfig::FEATURE_COUNT,
            config.hidden_width,
            AgentConfig::ACTION_COUNT,
        )
    }

    /// Zero table or freshly initialized network, per `config.policy`.
    pub fn fresh<R: Rng + ?Sized>(config: &AgentConfig, rng: &mut R) -> Self {
        match config.policy {
            PolicyKind::Tabular => PolicyModel::Tabular(QTable::new()),
            PolicyKind::Network => {
                PolicyModel::Network(DenseNetwork::random(Self::network_shape(config), rng))
            }
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            PolicyModel::Tabular(_) => PolicyKind::Tabular,
            PolicyModel::Network(_) => PolicyKind::Network,
        }
    }

    pub fn validate(&self, config: &AgentConfig) -> Result<(), ShapeError> {
        if self.kind() != config.policy {
            return Err(ShapeError::Kind {
                expected: config.policy.name(),
                actual: self.kind().name(),
            });
        }

        match self {
            PolicyModel::Tabular(table) => table.validate(),
            PolicyModel::Network(network) => network.validate(Self::network_shape(config)),
        }
    }

    pub fn predict(&self, observation: &Observation) -> ActionValues {
        match self {
            PolicyModel::Tabular(table) => table.row(observation.state_index()),
            PolicyModel::Network(network) => {
                let mut values = [0.0; AgentConfig::ACTION_COUNT];
                for (slot, value) in values.iter_mut().zip(network.predict(&observation.features)) {
                    *slot = value;
                }
                values
            }
        }
    }

    fn max_value(&self, observation: &Observation) -> f64 {
        self.predict(observation)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Learns from one transition and returns the TD error.
    pub fn update(&mut self, transition: Transition<'_>, config: &AgentConfig) -> f64 {
        let bootstrap = match transition.next {
            NextState::Continue(next) => self.max_value(next),
            NextState::Terminal { respawn } => match config.terminal_bootstrap {
                TerminalBootstrap::Zero => 0.0,
                TerminalBootstrap::RespawnState => self.max_value(respawn),
            },
        };
        let target = transition.reward + config.discount * bootstrap;
        let action = transition.action.index();

        let error = match self {
            PolicyModel::Tabular(table) => table.update(
                transition.observation.state_index(),
                action,
                target,
                config.tabular_learning_rate,
            ),
            PolicyModel::Network(network) => network.td_step(
                &transition.observation.features,
                action,
                target,
                config.network_learning_rate,
            ),
        };

        tracing::trace!(
            action = %transition.action,
            reward = transition.reward,
            target,
            error,
            "policy update"
        );
        error
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::features::StateFlags;

    fn observation(flags: StateFlags) -> Observation {
        Observation {
            features: [0.5, 0.3, 0.2, 0.0, 1.0],
            flags,
        }
    }

    #[test]
    fn fresh_follows_configured_kind() {
        let mut rng = StdRng::seed_from_u64(7);
        let tabular = AgentConfig::new().with_policy(PolicyKind::Tabular);
        assert_eq!(PolicyModel::fresh(&tabular, &mut rng).kind(), PolicyKind::Tabular);
        let network = AgentConfig::new();
        assert_eq!(PolicyModel::fresh(&network, &mut rng).kind(), PolicyKind::Network);
    }

    #[test]
    fn validate_rejects_mismatched_models() {
        let mut rng = StdRng::seed_from_u64(8);
        let config = AgentConfig::new();

        let tabular = PolicyModel::Tabular(QTable::new());
        assert!(matches!(tabular.validate(&config), Err(ShapeError::Kind { .. })));

        let narrow = AgentConfig {
            hidden_width: 4,
            ..AgentConfig::new()
        };
        let small = PolicyModel::fresh(&narrow, &mut rng);
        assert!(matches!(small.validate(&config), Err(ShapeError::Declared { .. })));

        assert!(PolicyModel::fresh(&config, &mut rng).validate(&config).is_ok());
    }

    #[test]
    fn tabular_update_uses_bootstrapped_target() {
        let config = AgentConfig::new().with_policy(PolicyKind::Tabular);
        let mut model = PolicyModel::Tabular(QTable::new());
        let here = observation(StateFlags::HUNGRY);
        let there = observation(StateFlags::FOOD_NEAR);

        model.update(
            Transition {
                observation: &there,
                action: Action::Stay,
                reward: 1.0,
                next: NextState::Terminal { respawn: &there },
            },
            &config,
        );
        assert!((model.predict(&there)[0] - 0.1).abs() < 1e-12);

        model.update(
            Transition {
                observation: &here,
                action: Action::Left,
                reward: -0.02,
                next: NextState::Continue(&there),
            },
            &config,
        );
        let expected = 0.1 * (-0.02 + 0.9 * 0.1);
        assert!((model.predict(&here)[Action::Left.index()] - expected).abs() < 1e-12);
    }

    #[test]
    fn terminal_bootstrap_modes_differ() {
        let here = observation(StateFlags::PREDATOR_NEAR);
        let respawn = observation(StateFlags::empty());

        let mut table = QTable::new();
        table.update(respawn.state_index(), 2, 10.0, 1.0);
        let seeded = PolicyModel::Tabular(table);

        let transition = Transition {
            observation: &here,
            action: Action::Up,
            reward: -2.0,
            next: NextState::Terminal { respawn: &respawn },
        };

        let zero = AgentConfig::new().with_policy(PolicyKind::Tabular);
        let mut terminal = seeded.clone();
        terminal.update(transition, &zero);
        assert!((terminal.predict(&here)[Action::Up.index()] + 0.2).abs() < 1e-12);

        let legacy = zero.with_terminal_bootstrap(TerminalBootstrap::RespawnState);
        let mut bootstrapped = seeded;
        bootstrapped.update(transition, &legacy);
        let expected = 0.1 * (-2.0 + 0.9 * 10.0);
        assert!((bootstrapped.predict(&here)[Action::Up.index()] - expected).abs() < 1e-12);
    }

    #[test]
    fn network_predict_has_one_value_per_action() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = AgentConfig::new();
        let model = PolicyModel::fresh(&config, &mut rng);
        let values = model.predict(&observation(StateFlags::empty()));
        assert!(values.iter().all(|value| value.is_finite()));
    }
}
