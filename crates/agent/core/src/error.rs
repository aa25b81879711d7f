//! Common error infrastructure for agent-core.
//!
//! Nothing in the decision engine is fatal. Errors exist so that callers can
//! decide how loudly to log a degraded path (a discarded save, a malformed
//! model) before falling back to a fresh start.

/// Severity level of an error, used to pick a log level and recovery path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// The caller can continue with a fallback (fresh model, unsaved run).
    Recoverable,

    /// Input was malformed and should be rejected without retry.
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for errors raised by the decision engine and its adapters.
pub trait CoreError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// A persisted or constructed model whose dimensions disagree with the
/// expected `(inputs, hidden, outputs)` layout.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("{layer} has {actual} values, expected {expected}")]
    Layer {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("declared shape {actual:?} does not match expected {expected:?}")]
    Declared {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error("q-table has {actual} entries, expected {expected}")]
    Table { expected: usize, actual: usize },

    #[error("saved policy is {actual}, configured policy is {expected}")]
    Kind {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("model contains non-finite parameters")]
    NonFinite,
}

impl CoreError for ShapeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Layer { .. } => "SHAPE_LAYER",
            Self::Declared { .. } => "SHAPE_DECLARED",
            Self::Table { .. } => "SHAPE_TABLE",
            Self::Kind { .. } => "SHAPE_KIND",
            Self::NonFinite => "SHAPE_NON_FINITE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_errors_are_recoverable() {
        let err = ShapeError::Table {
            expected: 40,
            actual: 12,
        };
        assert!(err.severity().is_recoverable());
        assert_eq!(err.error_code(), "SHAPE_TABLE");
        assert_eq!(err.to_string(), "q-table has 12 entries, expected 40");
    }
}
