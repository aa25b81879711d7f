//! Runtime configuration structures and loaders.
use std::env;
use std::path::{Path, PathBuf};

use agent_core::{AgentConfig, PolicyKind};

use crate::api::{Result, RuntimeError};

/// Configuration shared by the controller and its persistence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub agent: AgentConfig,
    /// Steps between best-effort saves; zero disables periodic saving.
    pub save_interval: u64,
    /// Save file; the platform data directory is used when unset.
    pub save_path: Option<PathBuf>,
    /// Transcript lines kept before the oldest are dropped.
    pub transcript_capacity: usize,
    /// Seed for the exploration and initialization RNG; entropy when unset.
    pub seed: Option<u64>,
    pub metabolism: Metabolism,
    pub rewards: RewardSchedule,
}

impl RuntimeConfig {
    pub const DEFAULT_SAVE_INTERVAL: u64 = 30;
    pub const DEFAULT_TRANSCRIPT_CAPACITY: usize = 64;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ISLAND_SAVE_PATH` - Save file path (default: platform data directory)
    /// - `ISLAND_SAVE_INTERVAL` - Steps between saves (default: 30)
    /// - `ISLAND_SEED` - RNG seed (default: entropy)
    /// - `ISLAND_POLICY` - `network` or `tabular` (default: network)
    /// - `ISLAND_TRANSCRIPT_CAPACITY` - Transcript lines kept (default: 64)
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Reads a TOML file; missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| RuntimeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Applies the `ISLAND_*` variables on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = env::var("ISLAND_SAVE_PATH") {
            self.save_path = Some(PathBuf::from(path));
        }
        if let Some(interval) = read_env::<u64>("ISLAND_SAVE_INTERVAL") {
            self.save_interval = interval;
        }
        if let Some(seed) = read_env::<u64>("ISLAND_SEED") {
            self.seed = Some(seed);
        }
        if let Some(policy) = read_env::<PolicyKind>("ISLAND_POLICY") {
            self.agent.policy = policy;
        }
        if let Some(capacity) = read_env::<usize>("ISLAND_TRANSCRIPT_CAPACITY") {
            self.transcript_capacity = capacity.max(1);
        }
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_agent(mut self, agent: AgentConfig) -> Self {
        self.agent = agent;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            save_interval: Self::DEFAULT_SAVE_INTERVAL,
            save_path: None,
            transcript_capacity: Self::DEFAULT_TRANSCRIPT_CAPACITY,
            seed: None,
            metabolism: Metabolism::default(),
            rewards: RewardSchedule::default(),
        }
    }
}

/// Hunger bookkeeping per step.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Metabolism {
    /// Hunger lost every step.
    pub hunger_per_step: f64,
    /// Hunger restored by one food item.
    pub food_gain: f64,
}

impl Default for Metabolism {
    fn default() -> Self {
        Self {
            hunger_per_step: 0.8,
            food_gain: 45.0,
        }
    }
}

/// Reward components of one learning step.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RewardSchedule {
    pub step: f64,
    pub food: f64,
    pub predator_death: f64,
    pub starvation: f64,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            step: -0.02,
            food: 1.2,
            predator_death: -2.0,
            starvation: -1.5,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use agent_core::TerminalBootstrap;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RuntimeConfig::default();
        assert_eq!(config.save_interval, 30);
        assert_eq!(config.transcript_capacity, 64);
        assert_eq!(config.metabolism.hunger_per_step, 0.8);
        assert_eq!(config.rewards.predator_death, -2.0);
        assert_eq!(config.agent.hidden_width, 16);
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let config = RuntimeConfig::from_toml(
            r#"
            save_interval = 10
            seed = 7

            [agent]
            policy = "tabular"
            terminal_bootstrap = "respawn_state"

            [rewards]
            food = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.save_interval, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.agent.policy, PolicyKind::Tabular);
        assert_eq!(config.agent.terminal_bootstrap, TerminalBootstrap::RespawnState);
        assert_eq!(config.agent.discount, 0.9);
        assert_eq!(config.rewards.food, 2.0);
        assert_eq!(config.rewards.step, -0.02);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = RuntimeConfig::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(RuntimeError::ConfigRead { .. })));
    }
}
