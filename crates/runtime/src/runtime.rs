//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation state and the environment, and runs one
//! complete decision cycle per [`Runtime::step`]:
//!
//! ```text
//! drain advice ─► metabolize ─► encode ─► predict + bias ─► select
//!      ─► environment.apply ─► reward / death ─► learn ─► decay ε ─► save?
//! ```
//!
//! Everything happens synchronously on the caller's thread. Advice typed on
//! other threads arrives through [`AdviceSender`] and is applied at the next
//! step boundary.

use std::sync::Arc;

use agent_core::{
    Action, ActionSelector, AdviceParser, AdviceRule, AdviceRuleStore, Agent, BiasComposer,
    FeatureEncoder, IntentClassifier, NextState, Observation, Position, Tick, Transition,
    WorldSnapshot,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::api::{DeathCause, Environment, Result};
use crate::chat::{AdviceReply, Speaker, Transcript};
use crate::config::RuntimeConfig;
use crate::inbox::{AdviceInbox, AdviceSender};
use crate::repository::{FileSaveRepository, InMemorySaveRepository, SaveRepository};

/// Everything the controller mutates between steps.
#[derive(Debug)]
pub struct SimulationState {
    pub agent: Agent,
    pub advice: AdviceRuleStore,
    pub transcript: Transcript,
    /// Steps since the current episode started.
    pub tick: Tick,
    parser: AdviceParser,
}

impl SimulationState {
    pub fn parser(&self) -> &AdviceParser {
        &self.parser
    }
}

/// Summary of one decision cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    pub tick: Tick,
    pub action: Action,
    pub reward: f64,
    pub ate_food: bool,
    pub death: Option<DeathCause>,
    pub td_error: f64,
    pub epsilon: f64,
    pub saved: bool,
}

/// Single-threaded controller for one agent on one island.
pub struct Runtime<E: Environment> {
    config: RuntimeConfig,
    state: SimulationState,
    environment: E,
    repository: Box<dyn SaveRepository>,
    rng: StdRng,
    inbox: AdviceInbox,
    composer: BiasComposer,
}

impl<E: Environment> Runtime<E> {
    /// Create a new runtime builder around `environment`.
    pub fn builder(environment: E) -> RuntimeBuilder<E> {
        RuntimeBuilder::new(environment)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn agent(&self) -> &Agent {
        &self.state.agent
    }

    pub fn agent_mut(&mut self) -> &mut Agent {
        &mut self.state.agent
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.environment
    }

    pub fn transcript(&self) -> &Transcript {
        &self.state.transcript
    }

    /// Producer handle for advice typed on other threads.
    pub fn advice_sender(&self) -> AdviceSender {
        self.inbox.sender()
    }

    /// Current view of the world around the agent.
    pub fn snapshot(&self) -> WorldSnapshot<'_> {
        WorldSnapshot::capture(
            self.state.agent.position,
            self.state.agent.hunger,
            self.environment.terrain(),
            self.environment.entities(),
        )
    }

    /// Rules whose condition holds right now, in insertion order.
    pub fn active_rules(&self) -> Vec<&AdviceRule> {
        let snapshot = self.snapshot();
        self.state.advice.active(&snapshot).collect()
    }

    /// HUD label such as `"predator near, hungry"` or `"calm"`.
    pub fn state_label(&self) -> String {
        self.snapshot().state_label()
    }

    /// Runs one full decision and learning cycle.
    pub fn step(&mut self) -> StepReport {
        for utterance in self.inbox.drain() {
            self.submit_advice(&utterance);
        }

        self.state.tick = self.state.tick.next();
        let tick = self.state.tick;
        self.state
            .agent
            .metabolize(self.config.metabolism.hunger_per_step);

        let (observation, action) = self.decide();

        let outcome = self.environment.apply(self.state.agent.position, action);
        self.state.agent.position = outcome.position;

        let rewards = self.config.rewards;
        let mut reward = rewards.step;
        if outcome.ate_food {
            self.state.agent.eat(self.config.metabolism.food_gain);
            reward += rewards.food;
        }

        let death = if outcome.predator_hit {
            Some(DeathCause::Predator)
        } else if self.state.agent.is_starving() {
            Some(DeathCause::Starvation)
        } else {
            None
        };
        if let Some(cause) = death {
            reward += match cause {
                DeathCause::Predator => rewards.predator_death,
                DeathCause::Starvation => rewards.starvation,
            };
            self.respawn(cause);
        }

        let next = self.observe();
        let next_state = match death {
            Some(_) => NextState::Terminal { respawn: &next },
            None => NextState::Continue(&next),
        };
        let td_error = self.state.agent.policy_mut().update(
            Transition {
                observation: &observation,
                action,
                reward,
                next: next_state,
            },
            &self.config.agent,
        );
        self.state.agent.decay_exploration();

        let saved = tick.is_multiple_of(self.config.save_interval) && self.persist();

        let report = StepReport {
            tick,
            action,
            reward,
            ate_food: outcome.ate_food,
            death,
            td_error,
            epsilon: self.state.agent.epsilon(),
            saved,
        };
        tracing::debug!(
            tick = %report.tick,
            action = %report.action,
            reward = report.reward,
            td_error = report.td_error,
            epsilon = report.epsilon,
            "step"
        );
        report
    }

    fn observe(&self) -> Observation {
        FeatureEncoder::encode(&self.snapshot())
    }

    fn decide(&mut self) -> (Observation, Action) {
        let snapshot = WorldSnapshot::capture(
            self.state.agent.position,
            self.state.agent.hunger,
            self.environment.terrain(),
            self.environment.entities(),
        );
        let observation = FeatureEncoder::encode(&snapshot);
        let values = self.state.agent.policy().predict(&observation);
        let bias = self.composer.compose(self.state.advice.rules(), &snapshot);

        tracing::debug!(
            state = %snapshot.state_label(),
            ?values,
            ?bias,
            "scores"
        );

        let action = ActionSelector::choose(
            &values,
            bias.as_ref(),
            snapshot.validity,
            self.state.agent.epsilon(),
            &mut self.rng,
        );
        (observation, action)
    }

    fn respawn(&mut self, cause: DeathCause) {
        let spawn = self.environment.respawn_point();
        self.state.agent.respawn(spawn);
        tracing::info!(%cause, deaths = self.state.agent.deaths, %spawn, "agent died");
        self.state.transcript.push(
            Speaker::Agent,
            format!("I lost a life to {cause}, but I will keep learning."),
        );
    }

    /// Parses one utterance, applies it to the rule store and records both
    /// sides in the transcript.
    pub fn submit_advice(&mut self, utterance: &str) -> AdviceReply {
        let utterance = utterance.trim();
        self.state.transcript.push(Speaker::Operator, utterance);

        let outcome = self.state.parser.parse(utterance);
        let reply = AdviceReply::resolve(outcome, &mut self.state.advice);

        self.state.transcript.push(Speaker::Agent, reply.to_string());
        reply
    }

    /// Saves, builds a new island and restarts the agent from the save.
    ///
    /// Advice rules are dropped; rule ids keep counting.
    pub fn reset_episode(&mut self) {
        self.persist();
        self.environment.regenerate();

        let spawn = self.environment.respawn_point();
        let saved = load_best_effort(self.repository.as_ref());
        self.state.agent = Agent::restore(spawn, saved, &self.config.agent, &mut self.rng);
        self.state.advice.clear();
        self.state.tick = Tick::ZERO;
        self.state
            .transcript
            .push(Speaker::Agent, "New island generated. I will keep learning.");
        tracing::info!(%spawn, "episode reset");
    }

    /// Best-effort save; failures are logged and reported as `false`.
    pub fn persist(&self) -> bool {
        match self.repository.save(&self.state.agent.to_record()) {
            Ok(()) => {
                tracing::info!(tick = %self.state.tick, "agent saved");
                true
            }
            Err(error) => {
                tracing::warn!(%error, "save failed");
                false
            }
        }
    }
}

fn load_best_effort(repository: &dyn SaveRepository) -> Option<agent_core::SaveRecord> {
    match repository.load() {
        Ok(record) => record,
        Err(error) => {
            tracing::warn!(%error, "ignoring unreadable save");
            None
        }
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder<E: Environment> {
    config: RuntimeConfig,
    environment: E,
    repository: Option<Box<dyn SaveRepository>>,
    classifier: Option<Arc<IntentClassifier>>,
    spawn: Option<Position>,
}

impl<E: Environment> RuntimeBuilder<E> {
    fn new(environment: E) -> Self {
        Self {
            config: RuntimeConfig::default(),
            environment,
            repository: None,
            classifier: None,
            spawn: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Persist through `repository` instead of the configured save file.
    pub fn repository(mut self, repository: impl SaveRepository + 'static) -> Self {
        self.repository = Some(Box::new(repository));
        self
    }

    /// Share an already trained classifier.
    pub fn classifier(mut self, classifier: Arc<IntentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Start the agent at `spawn` instead of asking the environment.
    pub fn spawn(mut self, spawn: Position) -> Self {
        self.spawn = Some(spawn);
        self
    }

    /// Build the runtime, restoring the agent from the repository if possible.
    pub fn build(self) -> Result<Runtime<E>> {
        let RuntimeBuilder {
            config,
            mut environment,
            repository,
            classifier,
            spawn,
        } = self;

        let repository = match repository {
            Some(repository) => repository,
            None => default_repository(&config)?,
        };
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let classifier = classifier.unwrap_or_else(|| Arc::new(IntentClassifier::pretrained()));

        let spawn = spawn.unwrap_or_else(|| environment.respawn_point());
        let saved = load_best_effort(repository.as_ref());
        let agent = Agent::restore(spawn, saved, &config.agent, &mut rng);

        let state = SimulationState {
            agent,
            advice: AdviceRuleStore::new(),
            transcript: Transcript::new(config.transcript_capacity),
            tick: Tick::ZERO,
            parser: AdviceParser::new(classifier, config.agent.classifier_threshold),
        };

        tracing::info!(
            policy = %config.agent.policy,
            save_interval = config.save_interval,
            "runtime ready"
        );

        Ok(Runtime {
            composer: BiasComposer::from_config(&config.agent),
            config,
            state,
            environment,
            repository,
            rng,
            inbox: AdviceInbox::new(),
        })
    }
}

fn default_repository(config: &RuntimeConfig) -> Result<Box<dyn SaveRepository>> {
    if let Some(path) = &config.save_path {
        return Ok(Box::new(FileSaveRepository::new(path)?));
    }

    match FileSaveRepository::at_default_location() {
        Ok(repository) => Ok(Box::new(repository)),
        Err(error) => {
            tracing::warn!(%error, "no save location, keeping the agent in memory");
            Ok(Box::new(InMemorySaveRepository::new()))
        }
    }
}
