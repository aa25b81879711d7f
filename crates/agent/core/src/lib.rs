//! Adaptive decision engine for the island agent.
//!
//! `agent-core` turns a [`WorldSnapshot`] into one [`Action`] per step and
//! learns from the resulting reward. It also interprets free-text operator
//! advice into [`AdviceRule`]s whose bias is blended into action selection.
//!
//! ```text
//! WorldSnapshot ─► FeatureEncoder ─► PolicyModel::predict ─┐
//!                                                          ├─► ActionSelector ─► Action
//! AdviceRuleStore ─► BiasComposer ─────────────────────────┘
//! ```
//!
//! The crate is pure: no I/O, no clocks, randomness only through caller
//! supplied RNGs.
pub mod action;
pub mod advice;
pub mod config;
pub mod env;
pub mod error;
pub mod features;
pub mod network;
pub mod persist;
pub mod policy;
pub mod selector;
pub mod state;

pub use action::{Action, ActionSet, ActionValues};
pub use advice::{
    AdviceAction, AdviceCondition, AdviceParser, AdviceRule, AdviceRuleStore, BiasComposer,
    BiasVector, Classification, ControlCommand, Direction, HungerOp, Intent, IntentClassifier,
    ParseOutcome, RuleId,
};
pub use config::{AgentConfig, TerminalBootstrap};
pub use env::{
    EntityLayout, MapDimensions, Nearest, TerrainGrid, TerrainKind, TerrainOracle, WorldSnapshot,
};
pub use error::{CoreError, ErrorSeverity, ShapeError};
pub use features::{FeatureEncoder, FeatureVector, Observation, StateFlags};
pub use network::{DenseNetwork, NetworkShape};
pub use persist::SaveRecord;
pub use policy::{Exploration, NextState, PolicyKind, PolicyModel, QTable, Transition};
pub use selector::ActionSelector;
pub use state::{Agent, Position, Tick};
