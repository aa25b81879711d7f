//! File-based SaveRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use agent_core::SaveRecord;

use crate::repository::{RepositoryError, Result, SaveRepository};

/// File-based implementation of SaveRepository.
///
/// Stores the agent as a single bincode file. Writes go to a sibling temp file
/// that is then renamed over the target, so a crash mid-write leaves the
/// previous save intact.
#[derive(Clone, Debug)]
pub struct FileSaveRepository {
    path: PathBuf,
}

impl FileSaveRepository {
    /// File name used inside the platform data directory.
    pub const FILE_NAME: &'static str = "agent.bin";

    /// Create a repository writing to `path`, creating its parent directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(RepositoryError::Io)?;
        }
        Ok(Self { path })
    }

    /// Platform data directory location.
    ///
    /// - Linux: `~/.local/share/island/agent.bin`
    /// - macOS: `~/Library/Application Support/island/agent.bin`
    /// - Windows: `%APPDATA%\island\data\agent.bin`
    pub fn default_path() -> Result<PathBuf> {
        directories::ProjectDirs::from("", "", "island")
            .map(|dirs| dirs.data_dir().join(Self::FILE_NAME))
            .ok_or(RepositoryError::NoSaveLocation)
    }

    pub fn at_default_location() -> Result<Self> {
        Self::new(Self::default_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("bin.tmp")
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, record: &SaveRecord) -> Result<()> {
        let temp_path = self.temp_path();

        let bytes =
            bincode::serialize(record).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &self.path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved agent to {}", self.path.display());

        Ok(())
    }

    fn load(&self) -> Result<Option<SaveRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path).map_err(RepositoryError::Io)?;
        let record: SaveRecord = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!(
            "Loaded agent (version {}) from {}",
            record.version,
            self.path.display()
        );

        Ok(Some(record))
    }

    fn delete(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted save {}", self.path.display());
        }

        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use agent_core::{PolicyModel, QTable};

    use super::*;

    fn record() -> SaveRecord {
        let mut table = QTable::new();
        table.update(2, 4, 1.5, 0.1);
        SaveRecord {
            version: SaveRecord::VERSION,
            policy: PolicyModel::Tabular(table),
            foods_eaten: 3,
            deaths: 1,
            age: 120,
            epsilon: 0.27,
        }
    }

    #[test]
    fn save_then_load_returns_same_record() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path().join("nested/agent.bin")).unwrap();
        assert!(!repo.exists());
        assert_eq!(repo.load().unwrap(), None);

        repo.save(&record()).unwrap();
        assert!(repo.exists());
        assert!(!repo.temp_path().exists());
        assert_eq!(repo.load().unwrap(), Some(record()));

        repo.delete().unwrap();
        assert!(!repo.exists());
    }

    #[test]
    fn corrupted_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.bin");
        fs::write(&path, b"not a save").unwrap();

        let repo = FileSaveRepository::new(&path).unwrap();
        assert!(matches!(repo.load(), Err(RepositoryError::Serialization(_))));
    }
}
