//! In-memory SaveRepository implementation for tests and headless runs.

use std::sync::RwLock;

use agent_core::SaveRecord;

use crate::repository::{RepositoryError, Result, SaveRepository};

/// Keeps the save record in process memory.
#[derive(Debug, Default)]
pub struct InMemorySaveRepository {
    record: RwLock<Option<SaveRecord>>,
}

impl InMemorySaveRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a record already stored.
    pub fn with_record(record: SaveRecord) -> Self {
        Self {
            record: RwLock::new(Some(record)),
        }
    }
}

impl SaveRepository for InMemorySaveRepository {
    fn save(&self, record: &SaveRecord) -> Result<()> {
        let mut slot = self
            .record
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = Some(record.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveRecord>> {
        let slot = self
            .record
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slot.clone())
    }

    fn delete(&self) -> Result<()> {
        let mut slot = self
            .record
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = None;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.record
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }
}
