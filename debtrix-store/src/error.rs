//! Error types for the project store.

use debtrix_backend::BackendError;
use debtrix_types::{ProjectId, ValidationError};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by store operations.
///
/// Every failure is terminal for that single call; state is left as it
/// was and the message is fit for direct display.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// No signed-in user.
    #[error("not signed in")]
    NoSession,

    /// Draft or credential validation failed.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The project is not in the store.
    #[error("unknown project: {0}")]
    UnknownProject(ProjectId),

    /// The backend rejected the operation.
    #[error(transparent)]
    Backend(#[from] BackendError),
}
