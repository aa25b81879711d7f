//! Command implementations
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod advise;
mod classify;
mod inspect_save;
mod parse;

pub use advise::Advise;
pub use classify::Classify;
pub use inspect_save::InspectSave;
pub use parse::Parse;

use std::path::Path;

use agent_core::AgentConfig;
use anyhow::{Context, Result};
use runtime::RuntimeConfig;

/// Agent settings from `--config`, or the environment when no file is given.
fn agent_config(path: Option<&Path>) -> Result<AgentConfig> {
    let config = match path {
        Some(path) => RuntimeConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?
            .with_env_overrides(),
        None => RuntimeConfig::from_env(),
    };
    Ok(config.agent)
}

/// Joins trailing CLI words back into one utterance.
fn utterance(words: &[String]) -> String {
    words.join(" ")
}
