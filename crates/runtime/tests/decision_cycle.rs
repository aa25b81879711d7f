//! End-to-end decision cycles against a small hand-built island.
//!
//! Most tests run the tabular policy with exploration disabled so every step
//! is deterministic: all Q-values start at zero and advice alone decides.

use std::sync::{Arc, LazyLock};

use agent_core::{
    Action, AgentConfig, EntityLayout, IntentClassifier, MapDimensions, PolicyKind, PolicyModel,
    Position, QTable, RuleId, SaveRecord, TerrainGrid, TerrainKind, TerrainOracle, Tick,
};
use runtime::{
    AdviceReply, DeathCause, Environment, InMemorySaveRepository, Runtime, RuntimeConfig,
    SaveRepository, StepOutcome,
};

static CLASSIFIER: LazyLock<Arc<IntentClassifier>> =
    LazyLock::new(|| Arc::new(IntentClassifier::pretrained()));

const SPAWN: Position = Position::new(6, 6);

/// 8x8 all-land island with static entities and a fixed respawn cell.
struct FixtureIsland {
    grid: TerrainGrid,
    entities: EntityLayout,
    regenerated: usize,
}

impl FixtureIsland {
    fn open() -> Self {
        Self {
            grid: TerrainGrid::filled(MapDimensions::new(8, 8), TerrainKind::Land),
            entities: EntityLayout::new(),
            regenerated: 0,
        }
    }

    fn with_food(mut self, food: Position) -> Self {
        self.entities.food.push(food);
        self
    }

    fn with_predator(mut self, predator: Position) -> Self {
        self.entities.predators.push(predator);
        self
    }

    fn with_tree(mut self, tree: Position) -> Self {
        self.entities.trees.insert(tree);
        self
    }
}

impl Environment for FixtureIsland {
    fn terrain(&self) -> &dyn TerrainOracle {
        &self.grid
    }

    fn entities(&self) -> &EntityLayout {
        &self.entities
    }

    fn apply(&mut self, agent: Position, action: Action) -> StepOutcome {
        let destination = agent.step(action);
        let position = if self.grid.is_land(destination) && !self.entities.is_obstacle(destination)
        {
            destination
        } else {
            agent
        };

        let ate_food = match self.entities.food.iter().position(|food| *food == position) {
            Some(idx) => {
                self.entities.food.remove(idx);
                true
            }
            None => false,
        };

        StepOutcome {
            position,
            ate_food,
            predator_hit: self.entities.predators.contains(&position),
        }
    }

    fn respawn_point(&mut self) -> Position {
        SPAWN
    }

    fn regenerate(&mut self) {
        self.regenerated += 1;
        self.entities = EntityLayout::new();
    }
}

fn greedy_tabular() -> RuntimeConfig {
    let agent = AgentConfig {
        initial_epsilon: 0.0,
        epsilon_floor: 0.0,
        ..AgentConfig::new().with_policy(PolicyKind::Tabular)
    };
    RuntimeConfig::default().with_agent(agent).with_seed(7)
}

fn runtime_at(
    island: FixtureIsland,
    start: Position,
    config: RuntimeConfig,
) -> (Runtime<FixtureIsland>, Arc<InMemorySaveRepository>) {
    let repository = Arc::new(InMemorySaveRepository::new());
    let runtime = Runtime::builder(island)
        .config(config)
        .repository(Arc::clone(&repository))
        .classifier(Arc::clone(&CLASSIFIER))
        .spawn(start)
        .build()
        .unwrap();
    (runtime, repository)
}

fn last_line(runtime: &Runtime<FixtureIsland>) -> String {
    runtime.transcript().last().unwrap().to_string()
}

#[test]
fn plain_step_costs_hunger_and_decays_exploration() {
    let config = RuntimeConfig::default().with_seed(11);
    let (mut runtime, _) = runtime_at(FixtureIsland::open(), Position::new(3, 3), config);

    let report = runtime.step();

    assert_eq!(report.tick, Tick(1));
    assert!((report.reward - -0.02).abs() < 1e-12);
    assert!(!report.ate_food);
    assert_eq!(report.death, None);
    assert!(!report.saved);
    assert!((report.epsilon - 0.3 * 0.999).abs() < 1e-12);
    assert!((runtime.agent().hunger - 99.2).abs() < 1e-9);
    assert_eq!(runtime.agent().age, 1);
    assert_eq!(runtime.state().tick, Tick(1));
}

#[test]
fn advice_steers_greedy_agent_onto_food() {
    let island = FixtureIsland::open().with_food(Position::new(3, 2));
    let (mut runtime, _) = runtime_at(island, Position::new(2, 2), greedy_tabular());
    runtime.submit_advice("go east");

    let report = runtime.step();

    assert_eq!(report.action, Action::Right);
    assert!(report.ate_food);
    assert!((report.reward - 1.18).abs() < 1e-12);
    assert!((report.td_error - 1.18).abs() < 1e-12);
    assert_eq!(runtime.agent().position, Position::new(3, 2));
    assert_eq!(runtime.agent().foods_eaten, 1);
    assert_eq!(runtime.agent().hunger, AgentConfig::MAX_HUNGER);
    assert!(runtime.environment().entities.food.is_empty());
}

#[test]
fn predator_hit_is_terminal_and_respawns() {
    let island = FixtureIsland::open().with_predator(Position::new(3, 2));
    let (mut runtime, _) = runtime_at(island, Position::new(2, 2), greedy_tabular());
    runtime.submit_advice("go east");

    let report = runtime.step();

    assert_eq!(report.death, Some(DeathCause::Predator));
    assert!((report.reward - -2.02).abs() < 1e-12);
    // Terminal transitions bootstrap from zero.
    assert!((report.td_error - -2.02).abs() < 1e-12);
    assert_eq!(runtime.agent().deaths, 1);
    assert_eq!(runtime.agent().position, SPAWN);
    assert_eq!(runtime.agent().hunger, AgentConfig::MAX_HUNGER);
    assert_eq!(
        last_line(&runtime),
        "Agent: I lost a life to a predator, but I will keep learning."
    );
}

#[test]
fn starvation_kills_when_hunger_runs_out() {
    let (mut runtime, _) = runtime_at(FixtureIsland::open(), Position::new(2, 2), greedy_tabular());
    runtime.agent_mut().hunger = 0.5;

    let report = runtime.step();

    assert_eq!(report.death, Some(DeathCause::Starvation));
    assert!((report.reward - -1.52).abs() < 1e-12);
    assert_eq!(runtime.agent().deaths, 1);
    assert_eq!(runtime.agent().position, SPAWN);
    assert_eq!(
        last_line(&runtime),
        "Agent: I lost a life to starvation, but I will keep learning."
    );
}

#[test]
fn predator_takes_precedence_over_starvation() {
    let island = FixtureIsland::open().with_predator(Position::new(3, 2));
    let (mut runtime, _) = runtime_at(island, Position::new(2, 2), greedy_tabular());
    runtime.submit_advice("go east");
    runtime.agent_mut().hunger = 0.5;

    let report = runtime.step();

    assert_eq!(report.death, Some(DeathCause::Predator));
    assert!((report.reward - -2.02).abs() < 1e-12);
    assert_eq!(runtime.agent().deaths, 1);
}

#[test]
fn saves_on_the_configured_interval() {
    let config = RuntimeConfig {
        save_interval: 3,
        ..greedy_tabular()
    };
    let (mut runtime, repository) = runtime_at(FixtureIsland::open(), Position::new(3, 3), config);

    assert!(!runtime.step().saved);
    assert!(!runtime.step().saved);
    assert!(!repository.exists());

    assert!(runtime.step().saved);
    let record = repository.load().unwrap().unwrap();
    assert_eq!(record.version, SaveRecord::VERSION);
    assert_eq!(record.age, 3);
    assert_eq!(record.policy.kind(), PolicyKind::Tabular);
}

#[test]
fn build_restores_counters_from_repository() {
    let record = SaveRecord {
        version: SaveRecord::VERSION,
        policy: PolicyModel::Tabular(QTable::new()),
        foods_eaten: 9,
        deaths: 4,
        age: 500,
        epsilon: 0.12,
    };
    let runtime = Runtime::builder(FixtureIsland::open())
        .config(greedy_tabular())
        .repository(InMemorySaveRepository::with_record(record))
        .classifier(Arc::clone(&CLASSIFIER))
        .spawn(Position::new(1, 1))
        .build()
        .unwrap();

    assert_eq!(runtime.agent().foods_eaten, 9);
    assert_eq!(runtime.agent().deaths, 4);
    assert_eq!(runtime.agent().age, 500);
    assert_eq!(runtime.agent().position, Position::new(1, 1));
}

#[test]
fn corrupted_save_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent.bin");
    std::fs::write(&path, b"garbage").unwrap();

    let config = RuntimeConfig {
        save_path: Some(path),
        ..greedy_tabular()
    };
    let runtime = Runtime::builder(FixtureIsland::open())
        .config(config)
        .classifier(Arc::clone(&CLASSIFIER))
        .build()
        .unwrap();

    assert_eq!(runtime.agent().foods_eaten, 0);
    assert_eq!(runtime.agent().position, SPAWN);
}

#[test]
fn queued_advice_is_applied_at_the_next_step() {
    let (mut runtime, _) = runtime_at(FixtureIsland::open(), Position::new(3, 3), greedy_tabular());
    let sender = runtime.advice_sender();

    std::thread::spawn(move || assert!(sender.send("go north")))
        .join()
        .unwrap();
    assert!(runtime.state().advice.is_empty());

    let report = runtime.step();

    assert_eq!(runtime.state().advice.len(), 1);
    assert_eq!(report.action, Action::Up);
    assert_eq!(runtime.agent().position, Position::new(3, 2));
    let lines: Vec<String> = runtime.transcript().lines().map(ToString::to_string).collect();
    assert!(lines.contains(&"You: go north".to_string()));
    assert!(lines.contains(
        &"Agent: Rule saved: go north. I will keep it even if I lose a life.".to_string()
    ));
}

#[test]
fn control_commands_manage_rules() {
    let (mut runtime, _) = runtime_at(FixtureIsland::open(), Position::new(3, 3), greedy_tabular());

    assert_eq!(
        runtime.submit_advice("list rules"),
        AdviceReply::Listed(Vec::new())
    );
    assert_eq!(
        runtime.submit_advice("avoid predators"),
        AdviceReply::RuleAdded("avoid predators".to_string())
    );
    runtime.submit_advice("go west");
    assert_eq!(
        runtime.submit_advice("list rules"),
        AdviceReply::Listed(vec!["avoid predators".to_string(), "go west".to_string()])
    );
    assert_eq!(
        runtime.submit_advice("undo"),
        AdviceReply::Removed(Some("go west".to_string()))
    );
    assert_eq!(runtime.submit_advice("clear"), AdviceReply::Cleared);
    assert_eq!(runtime.submit_advice("undo"), AdviceReply::Removed(None));
    assert_eq!(runtime.submit_advice("xyzzy quux"), AdviceReply::Unrecognized);
    assert!(runtime.state().advice.is_empty());
    assert_eq!(
        last_line(&runtime),
        "Agent: I did not understand. Try: \"get food when hunger is below 50%\"."
    );
}

#[test]
fn active_rules_follow_the_current_state() {
    let (mut runtime, _) = runtime_at(FixtureIsland::open(), Position::new(3, 3), greedy_tabular());
    runtime.submit_advice("get food when hunger is below 50%");
    runtime.submit_advice("go north");

    assert_eq!(runtime.state_label(), "calm");
    let active: Vec<&str> = runtime
        .active_rules()
        .into_iter()
        .map(|rule| rule.text.as_str())
        .collect();
    assert_eq!(active, vec!["go north"]);

    runtime.agent_mut().hunger = 20.0;
    assert_eq!(runtime.state_label(), "hungry");
    assert_eq!(runtime.active_rules().len(), 2);
}

#[test]
fn boxed_in_agent_can_only_stay() {
    let island = FixtureIsland::open()
        .with_tree(Position::new(3, 2))
        .with_tree(Position::new(3, 4))
        .with_tree(Position::new(2, 3))
        .with_tree(Position::new(4, 3));
    let agent = AgentConfig {
        initial_epsilon: 1.0,
        epsilon_floor: 1.0,
        ..AgentConfig::new()
    };
    let config = RuntimeConfig::default().with_agent(agent).with_seed(3);
    let (mut runtime, _) = runtime_at(island, Position::new(3, 3), config);

    for _ in 0..20 {
        assert_eq!(runtime.step().action, Action::Stay);
    }
    assert_eq!(runtime.agent().position, Position::new(3, 3));
}

#[test]
fn reset_episode_keeps_learning_but_drops_advice() {
    let (mut runtime, repository) =
        runtime_at(FixtureIsland::open(), Position::new(3, 3), greedy_tabular());
    runtime.submit_advice("go north");
    runtime.step();
    runtime.step();

    runtime.reset_episode();

    assert!(repository.exists());
    assert_eq!(runtime.environment().regenerated, 1);
    assert!(runtime.state().advice.is_empty());
    assert_eq!(runtime.state().tick, Tick::ZERO);
    assert_eq!(runtime.agent().position, SPAWN);
    assert_eq!(runtime.agent().age, 2);
    assert_eq!(
        last_line(&runtime),
        "Agent: New island generated. I will keep learning."
    );

    runtime.submit_advice("go west");
    assert_eq!(runtime.state().advice.rules()[0].id, RuleId(2));
}
