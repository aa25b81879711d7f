//! Decode and summarize a saved agent.

use std::path::{Path, PathBuf};

use agent_core::{Action, AgentConfig, PolicyModel, SaveRecord, StateFlags};
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use runtime::FileSaveRepository;

/// Decode a save file and report its contents
#[derive(Parser)]
pub struct InspectSave {
    /// Save file (defaults to the platform data directory)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Runtime config file (TOML) the save is validated against
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the tabular Q-values
    #[arg(long)]
    values: bool,
}

impl InspectSave {
    pub fn execute(self) -> Result<()> {
        let path = match self.path {
            Some(path) => path,
            None => FileSaveRepository::default_path().context("No default save location")?,
        };
        let agent = super::agent_config(self.config.as_deref())?;

        let record = read_record(&path)?;

        println!("{} {}", style("Save File:").bold().cyan(), path.display());
        print_summary(&record, &agent);

        if self.values {
            match &record.policy {
                PolicyModel::Tabular(_) => print_values(&record.policy),
                PolicyModel::Network(_) => {
                    println!("{}", style("Q-values are only listed for tabular saves").dim())
                }
            }
        }

        Ok(())
    }
}

fn read_record(path: &Path) -> Result<SaveRecord> {
    if !path.exists() {
        anyhow::bail!("Save file not found: {}", path.display());
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read save file: {}", path.display()))?;
    bincode::deserialize(&bytes)
        .with_context(|| format!("Failed to deserialize save file: {}", path.display()))
}

fn print_summary(record: &SaveRecord, agent: &AgentConfig) {
    println!();
    println!("{}", style("=== Agent Save Summary ===").bold().green());

    let version = if record.is_current() {
        style(format!("{} (current)", record.version)).green()
    } else {
        style(format!("{} (expected {})", record.version, SaveRecord::VERSION)).red()
    };
    println!("  Version: {version}");
    println!("  Policy: {}", record.policy.kind());
    match record.policy.validate(agent) {
        Ok(()) => println!("  Shape: {}", style("compatible").green()),
        Err(error) => println!("  Shape: {}", style(error).red()),
    }
    println!("  Foods eaten: {}", record.foods_eaten);
    println!("  Deaths: {}", record.deaths);
    println!("  Age: {}", record.age);
    println!("  Epsilon: {:.4}", record.epsilon);
}

fn print_values(policy: &PolicyModel) {
    let PolicyModel::Tabular(table) = policy else {
        return;
    };
    println!();
    println!("{}", style("Q-values:").bold().yellow());
    let header: Vec<String> = Action::ALL.iter().map(|action| format!("{action:>8}")).collect();
    println!("  {:<36}{}", "state", header.join(""));
    for state in 0..AgentConfig::STATE_COUNT {
        let row: Vec<String> = table
            .row(state)
            .iter()
            .map(|value| format!("{value:>8.3}"))
            .collect();
        println!("  {:<36}{}", state_name(state), row.join(""));
    }
}

fn state_name(state: usize) -> String {
    let flags = StateFlags::from_bits_truncate(state as u8);
    if flags.is_empty() {
        return "calm".to_string();
    }
    flags
        .iter_names()
        .map(|(name, _)| name.to_lowercase().replace('_', " "))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use agent_core::QTable;

    use super::*;

    #[test]
    fn reads_bincode_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.bin");
        let record = SaveRecord {
            version: SaveRecord::VERSION,
            policy: PolicyModel::Tabular(QTable::new()),
            foods_eaten: 2,
            deaths: 1,
            age: 40,
            epsilon: 0.2,
        };
        std::fs::write(&path, bincode::serialize(&record).unwrap()).unwrap();

        assert_eq!(read_record(&path).unwrap(), record);
        assert!(read_record(&dir.path().join("missing.bin")).is_err());
    }

    #[test]
    fn state_names_follow_flag_bits() {
        assert_eq!(state_name(0), "calm");
        assert_eq!(state_name(3), "predator near, hungry");
        assert_eq!(state_name(7), "predator near, hungry, food near");
    }
}
