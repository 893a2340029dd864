//! Domain error types.

use thiserror::Error;

/// A business rule rejected a mutation.
///
/// Displays exactly the human-readable message, so callers can surface it
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Creates a validation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors a repository adapter can produce.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A record could not be converted to or from an aggregate.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}
