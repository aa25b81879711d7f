//! Repository contract for saving and loading the agent.

use std::sync::Arc;

use agent_core::SaveRecord;

use super::Result;

/// Storage for the single save slot of an agent.
///
/// `load` returns the record as stored; version and shape checks belong to the
/// caller so that every repository degrades the same way.
pub trait SaveRepository: Send + Sync {
    /// Replace the stored record.
    fn save(&self, record: &SaveRecord) -> Result<()>;

    /// Load the stored record, `None` when nothing has been saved.
    fn load(&self) -> Result<Option<SaveRecord>>;

    /// Remove the stored record if present.
    fn delete(&self) -> Result<()>;

    /// Check whether a record is stored.
    fn exists(&self) -> bool;
}

impl<T: SaveRepository + ?Sized> SaveRepository for Arc<T> {
    fn save(&self, record: &SaveRecord) -> Result<()> {
        (**self).save(record)
    }

    fn load(&self) -> Result<Option<SaveRecord>> {
        (**self).load()
    }

    fn delete(&self) -> Result<()> {
        (**self).delete()
    }

    fn exists(&self) -> bool {
        (**self).exists()
    }
}
