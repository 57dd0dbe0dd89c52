//! Error types for backend operations.

use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors surfaced by the backend collaborator.
///
/// The hosted service reports failures as structured responses; the
/// in-memory implementation produces the same shapes so failure paths
/// can be exercised without a network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Credentials rejected or no active session.
    #[error("authentication error: {0}")]
    Auth(String),

    /// A referenced row does not exist (or is not visible to the caller).
    #[error("not found: {0}")]
    NotFound(String),

    /// Uniqueness or ownership constraint violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The query itself was rejected.
    #[error("query error: {0}")]
    Query(String),

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),
}
