//! Typed error enum for the service layer.
//!
//! Wraps storage failures and adds the session state machine's rejections so
//! the HTTP layer can map each one onto a status code without string matching.

use streakcert_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Caller provided invalid input (unknown certification, missing selection).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The session for the day is already completed and can no longer change.
    #[error("session already completed")]
    SessionCompleted,

    #[error("question {0} already answered")]
    AlreadyAnswered(usize),

    /// A step needs question `index` answered first.
    #[error("question {index} has not been answered")]
    Unanswered { index: usize },

    #[error("question index {index} out of range for batch of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// No session has been started for the user today.
    #[error("no active session for today")]
    NoActiveSession,
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_transient())
    }

    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::NotFound { .. }))
    }

    /// Whether this error represents a duplicate/conflict.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }

    pub(crate) fn profile_not_found(user_id: &str) -> Self {
        Self::Storage(StorageError::NotFound { entity: "user_profile", id: user_id.to_owned() })
    }
}
