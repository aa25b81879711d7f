//! Unified error types surfaced by the runtime API.
//!
//! Only construction and configuration can fail. Once a [`crate::Runtime`] is
//! built, persistence failures are logged and swallowed.
use std::path::PathBuf;

use agent_core::{CoreError, ErrorSeverity};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl CoreError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Repository(error) => error.severity(),
            Self::ConfigRead { .. } | Self::ConfigParse { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Repository(error) => error.error_code(),
            Self::ConfigRead { .. } => "RUNTIME_CONFIG_READ",
            Self::ConfigParse { .. } => "RUNTIME_CONFIG_PARSE",
        }
    }
}
