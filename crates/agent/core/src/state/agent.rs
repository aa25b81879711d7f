use rand::Rng;

use crate::config::AgentConfig;
use crate::persist::SaveRecord;
use crate::policy::{Exploration, PolicyModel};
use crate::state::Position;

/// The learning agent: body state, lifetime counters and the learned policy.
///
/// Deaths only reset position and hunger; counters, exploration and the policy
/// survive until the agent is dropped.
#[derive(Clone, Debug)]
pub struct Agent {
    pub position: Position,
    /// In `[0, MAX_HUNGER]`; higher is more satiated.
    pub hunger: f64,
    pub foods_eaten: u64,
    pub deaths: u64,
    /// Steps lived across all lives.
    pub age: u64,
    exploration: Exploration,
    policy: PolicyModel,
}

impl Agent {
    pub fn new<R: Rng + ?Sized>(position: Position, config: &AgentConfig, rng: &mut R) -> Self {
        Self {
            position,
            hunger: AgentConfig::MAX_HUNGER,
            foods_eaten: 0,
            deaths: 0,
            age: 0,
            exploration: Exploration::from_config(config),
            policy: PolicyModel::fresh(config, rng),
        }
    }

    /// Resumes from `saved` when it is current and its policy fits `config`;
    /// otherwise starts fresh as if nothing had been saved.
    pub fn restore<R: Rng + ?Sized>(
        position: Position,
        saved: Option<SaveRecord>,
        config: &AgentConfig,
        rng: &mut R,
    ) -> Self {
        let Some(record) = saved else {
            return Self::new(position, config, rng);
        };
        if !record.is_current() {
            tracing::warn!(
                found = record.version,
                expected = SaveRecord::VERSION,
                "ignoring save with unsupported version"
            );
            return Self::new(position, config, rng);
        }
        if let Err(error) = record.policy.validate(config) {
            tracing::warn!(%error, "ignoring save with incompatible policy");
            return Self::new(position, config, rng);
        }

        tracing::info!(
            foods = record.foods_eaten,
            deaths = record.deaths,
            age = record.age,
            epsilon = record.epsilon,
            "restoring agent"
        );

        Self {
            position,
            hunger: AgentConfig::MAX_HUNGER,
            foods_eaten: record.foods_eaten,
            deaths: record.deaths,
            age: record.age,
            exploration: Exploration::new(record.epsilon, config),
            policy: record.policy,
        }
    }

    pub fn to_record(&self) -> SaveRecord {
        SaveRecord {
            version: SaveRecord::VERSION,
            policy: self.policy.clone(),
            foods_eaten: self.foods_eaten,
            deaths: self.deaths,
            age: self.age,
            epsilon: self.exploration.epsilon(),
        }
    }

    pub fn policy(&self) -> &PolicyModel {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut PolicyModel {
        &mut self.policy
    }

    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon()
    }

    pub fn decay_exploration(&mut self) {
        self.exploration.decay();
    }

    /// Burns `cost` hunger and ages the agent by one step.
    pub fn metabolize(&mut self, cost: f64) {
        self.hunger = (self.hunger - cost).clamp(0.0, AgentConfig::MAX_HUNGER);
        self.age += 1;
    }

    pub fn eat(&mut self, gain: f64) {
        self.hunger = (self.hunger + gain).clamp(0.0, AgentConfig::MAX_HUNGER);
        self.foods_eaten += 1;
    }

    pub fn is_starving(&self) -> bool {
        self.hunger <= 0.0
    }

    /// Counts a death and moves the agent to `spawn` with full hunger.
    pub fn respawn(&mut self, spawn: Position) {
        self.deaths += 1;
        self.position = spawn;
        self.hunger = AgentConfig::MAX_HUNGER;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::policy::{PolicyKind, QTable};

    #[test]
    fn hunger_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut agent = Agent::new(Position::ORIGIN, &AgentConfig::new(), &mut rng);
        agent.eat(45.0);
        assert_eq!(agent.hunger, 100.0);
        for _ in 0..200 {
            agent.metabolize(0.8);
        }
        assert_eq!(agent.hunger, 0.0);
        assert!(agent.is_starving());
        assert_eq!(agent.age, 200);
        assert_eq!(agent.foods_eaten, 1);
    }

    #[test]
    fn respawn_keeps_learning_state() {
        let mut rng = StdRng::seed_from_u64(32);
        let mut agent = Agent::new(Position::new(3, 4), &AgentConfig::new(), &mut rng);
        agent.metabolize(30.0);
        agent.decay_exploration();
        let policy = agent.policy().clone();
        let epsilon = agent.epsilon();

        agent.respawn(Position::new(9, 9));

        assert_eq!(agent.position, Position::new(9, 9));
        assert_eq!(agent.hunger, 100.0);
        assert_eq!(agent.deaths, 1);
        assert_eq!(agent.age, 1);
        assert_eq!(agent.epsilon(), epsilon);
        assert_eq!(agent.policy(), &policy);
    }

    #[test]
    fn restore_accepts_current_record() {
        let mut rng = StdRng::seed_from_u64(33);
        let config = AgentConfig::new().with_policy(PolicyKind::Tabular);
        let mut table = QTable::new();
        table.update(1, 1, 4.0, 0.5);
        let record = SaveRecord {
            version: SaveRecord::VERSION,
            policy: PolicyModel::Tabular(table),
            foods_eaten: 7,
            deaths: 2,
            age: 900,
            epsilon: 0.12,
        };

        let agent = Agent::restore(Position::ORIGIN, Some(record.clone()), &config, &mut rng);
        assert_eq!(agent.to_record(), record);
    }

    #[test]
    fn restore_ignores_old_versions() {
        let mut rng = StdRng::seed_from_u64(34);
        let config = AgentConfig::new();
        let record = SaveRecord {
            version: 1,
            policy: PolicyModel::fresh(&config, &mut rng),
            foods_eaten: 7,
            deaths: 2,
            age: 900,
            epsilon: 0.12,
        };

        let agent = Agent::restore(Position::ORIGIN, Some(record), &config, &mut rng);
        assert_eq!(agent.foods_eaten, 0);
        assert_eq!(agent.epsilon(), 0.3);
    }

    #[test]
    fn restore_with_mismatched_policy_starts_fresh() {
        let mut rng = StdRng::seed_from_u64(35);
        let config = AgentConfig::new();
        let record = SaveRecord {
            version: SaveRecord::VERSION,
            policy: PolicyModel::Tabular(QTable::new()),
            foods_eaten: 4,
            deaths: 1,
            age: 60,
            epsilon: 0.2,
        };

        let agent = Agent::restore(Position::ORIGIN, Some(record), &config, &mut rng);
        assert_eq!(agent.policy().kind(), PolicyKind::Network);
        assert_eq!(agent.foods_eaten, 0);
        assert_eq!(agent.deaths, 0);
        assert_eq!(agent.epsilon(), 0.3);
    }
}
