//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration and persistence.

pub mod environment;
pub mod errors;

pub use environment::{DeathCause, Environment, StepOutcome};
pub use errors::{Result, RuntimeError};
