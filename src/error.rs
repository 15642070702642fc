//! Error types for batched operations
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Batch Error Enum ==
/// Outcome of a batched operation that did not produce a value.
///
/// The operation's own error is carried verbatim in `Operation`; the other
/// variants cover outcomes the operation itself never got to report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError<E> {
    /// The operation ran and failed with its own error
    #[error("operation failed: {0}")]
    Operation(E),

    /// The operation panicked while its wave was running
    #[error("operation panicked: {0}")]
    Panicked(String),

    /// The wave never delivered an outcome, e.g. the runtime shut down and the
    /// coalescer holding the operation was dropped before any flush
    #[error("batch dropped before the operation settled")]
    Dropped,
}

impl<E> BatchError<E> {
    /// Returns the operation's own error, if that is what this is.
    pub fn into_operation(self) -> Option<E> {
        match self {
            BatchError::Operation(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_operation(&self) -> bool {
        matches!(self, BatchError::Operation(_))
    }
}

// == Result Type Alias ==
/// Result of a batched operation.
pub type Result<T, E> = std::result::Result<T, BatchError<E>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_operation() {
        let err: BatchError<&str> = BatchError::Operation("boom");
        assert!(err.is_operation());
        assert_eq!(err.into_operation(), Some("boom"));

        let err: BatchError<&str> = BatchError::Dropped;
        assert!(!err.is_operation());
        assert_eq!(err.into_operation(), None);
    }

    #[test]
    fn test_display() {
        let err: BatchError<String> = BatchError::Operation("timeout".to_string());
        assert_eq!(err.to_string(), "operation failed: timeout");

        let err: BatchError<String> = BatchError::Panicked("index out of bounds".to_string());
        assert_eq!(err.to_string(), "operation panicked: index out of bounds");
    }
}
