//! Agent state and the primitive value types it is built from.
mod agent;
mod common;

pub use agent::Agent;
pub use common::{Position, Tick};
