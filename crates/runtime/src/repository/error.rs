//! Error types raised by repository implementations.

use agent_core::{CoreError, ErrorSeverity};
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("save repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("no save location available")]
    NoSaveLocation,
}

impl CoreError for RepositoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::LockPoisoned => ErrorSeverity::Internal,
            Self::Io(_) | Self::Serialization(_) | Self::NoSaveLocation => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "REPOSITORY_LOCK_POISONED",
            Self::Io(_) => "REPOSITORY_IO",
            Self::Serialization(_) => "REPOSITORY_SERIALIZATION",
            Self::NoSaveLocation => "REPOSITORY_NO_SAVE_LOCATION",
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
