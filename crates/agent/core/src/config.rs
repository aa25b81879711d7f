use crate::policy::PolicyKind;

/// Learning and advice parameters for a single agent.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Value-function representation used for new agents.
    pub policy: PolicyKind,
    /// Hidden width of the policy network.
    pub hidden_width: usize,
    /// Step size of the semi-gradient TD update (network policy).
    pub network_learning_rate: f64,
    /// Step size of the Q-learning update (tabular policy).
    pub tabular_learning_rate: f64,
    /// Discount applied to the bootstrapped next-state value.
    pub discount: f64,
    /// Exploration rate for agents without a saved one.
    pub initial_epsilon: f64,
    /// Multiplicative decay applied after every step.
    pub epsilon_decay: f64,
    /// Lower bound for the exploration rate.
    pub epsilon_floor: f64,
    /// Value bootstrapped after a death.
    pub terminal_bootstrap: TerminalBootstrap,
    /// Total bias budget shared by all active advice rules.
    pub advice_weight: f64,
    /// Minimum classifier confidence for accepting a fallback intent.
    pub classifier_threshold: f64,
}

impl AgentConfig {
    // ===== compile-time constants =====
    /// Features produced by the encoder.
    pub const FEATURE_COUNT: usize = 5;
    /// Discrete states of the tabular encoding (three binary flags).
    pub const STATE_COUNT: usize = 8;
    /// Actions available to the agent.
    pub const ACTION_COUNT: usize = 5;
    /// Manhattan distance at or below which a predator counts as near.
    pub const PREDATOR_NEAR: u32 = 3;
    /// Manhattan distance at or below which food counts as near.
    pub const FOOD_NEAR: u32 = 4;
    /// Distance reported when no entity of a kind exists.
    pub const DISTANCE_SENTINEL: u32 = 10;
    /// Hunger at or below which the agent is considered hungry.
    pub const HUNGRY_AT: f64 = 40.0;
    /// Upper bound of the hunger meter.
    pub const MAX_HUNGER: f64 = 100.0;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HIDDEN_WIDTH: usize = 16;
    pub const DEFAULT_NETWORK_LEARNING_RATE: f64 = 0.05;
    pub const DEFAULT_TABULAR_LEARNING_RATE: f64 = 0.1;
    pub const DEFAULT_DISCOUNT: f64 = 0.9;
    pub const DEFAULT_INITIAL_EPSILON: f64 = 0.3;
    pub const DEFAULT_EPSILON_DECAY: f64 = 0.999;
    pub const DEFAULT_EPSILON_FLOOR: f64 = 0.05;
    pub const DEFAULT_ADVICE_WEIGHT: f64 = 0.6;
    pub const DEFAULT_CLASSIFIER_THRESHOLD: f64 = 0.6;

    pub fn new() -> Self {
        Self {
            policy: PolicyKind::Network,
            hidden_width: Self::DEFAULT_HIDDEN_WIDTH,
            network_learning_rate: Self::DEFAULT_NETWORK_LEARNING_RATE,
            tabular_learning_rate: Self::DEFAULT_TABULAR_LEARNING_RATE,
            discount: Self::DEFAULT_DISCOUNT,
            initial_epsilon: Self::DEFAULT_INITIAL_EPSILON,
            epsilon_decay: Self::DEFAULT_EPSILON_DECAY,
            epsilon_floor: Self::DEFAULT_EPSILON_FLOOR,
            terminal_bootstrap: TerminalBootstrap::Zero,
            advice_weight: Self::DEFAULT_ADVICE_WEIGHT,
            classifier_threshold: Self::DEFAULT_CLASSIFIER_THRESHOLD,
        }
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_terminal_bootstrap(mut self, terminal_bootstrap: TerminalBootstrap) -> Self {
        self.terminal_bootstrap = terminal_bootstrap;
        self
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// How the learning target is bootstrapped on the step that killed the agent.
///
/// `Zero` treats death as terminal. `RespawnState` bootstraps from the
/// observation taken after respawning, which ties the value of a fatal move to
/// wherever the agent happens to reappear; it is kept for models trained that way.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerminalBootstrap {
    #[default]
    Zero,
    RespawnState,
}
