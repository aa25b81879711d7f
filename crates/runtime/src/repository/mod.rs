//! Repository layer for the agent's learned state.
//!
//! Repositories persist the [`agent_core::SaveRecord`] between sessions. All
//! callers treat them as best-effort: errors are reported to the runtime,
//! which logs them and keeps running.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepository;
pub use traits::SaveRepository;
