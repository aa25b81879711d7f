//! Runtime orchestration for the island agent.
//!
//! This crate wires the pure decision engine from `agent-core` to an external
//! [`Environment`], a save repository and an advice transcript. Consumers embed
//! [`Runtime`] and call [`Runtime::step`] once per logic tick.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the controller and builder
//! - [`api`] exposes the types downstream clients implement or receive
//! - [`config`] loads runtime settings from TOML and the environment
//! - [`chat`] renders advice replies into a bounded transcript
//! - [`repository`] persists the agent between sessions
pub mod api;
pub mod chat;
pub mod config;
pub mod repository;
pub mod runtime;

mod inbox;

pub use api::{DeathCause, Environment, Result, RuntimeError, StepOutcome};
pub use chat::{AdviceReply, Speaker, Transcript, TranscriptLine};
pub use config::{Metabolism, RewardSchedule, RuntimeConfig};
pub use inbox::AdviceSender;
pub use repository::{
    FileSaveRepository, InMemorySaveRepository, RepositoryError, SaveRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, SimulationState, StepReport};
