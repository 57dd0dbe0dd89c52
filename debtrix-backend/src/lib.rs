//! Backend collaborator interface for Debtrix.
//!
//! The hosted backend (session auth, relational storage, row-level
//! ownership, cascade deletes) is consumed through the [`Backend`] trait
//! and never reimplemented here. [`MemoryBackend`] is a faithful
//! in-memory stand-in used by tests and local development: it simulates
//! sessions, enforces the project→issue cascade, and supports per-call
//! fault injection.

mod error;
mod memory;

pub use error::{BackendError, BackendResult};
pub use memory::MemoryBackend;

use async_trait::async_trait;
use debtrix_types::{
    Issue, IssueDraft, IssueId, IssuePatch, ProjectDraft, ProjectId, ProjectPatch, ProjectRecord,
    UserId, UserProfile,
};
use tokio::sync::watch;

/// An authenticated session with the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
}

/// The backend collaborator: session auth plus typed table access.
///
/// All methods are terminal for a single request; nothing here retries.
#[async_trait]
pub trait Backend: Send + Sync {
    // ── Sessions ─────────────────────────────────────────────────

    /// Signs in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session>;

    /// Signs up a new user, creating the profile row.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> BackendResult<Session>;

    /// Ends the current session.
    async fn sign_out(&self) -> BackendResult<()>;

    /// Returns the current session, if any.
    async fn session(&self) -> Option<Session>;

    /// Subscribes to session changes (sign-in, sign-out, expiry).
    fn subscribe_session(&self) -> watch::Receiver<Option<Session>>;

    // ── Profiles ─────────────────────────────────────────────────

    /// Fetches a user's profile row.
    async fn fetch_profile(&self, user: UserId) -> BackendResult<UserProfile>;

    /// Generates and stores a fresh personal API key on the profile,
    /// returning it. Replaces any previous key.
    async fn rotate_api_key(&self, user: UserId) -> BackendResult<String>;

    // ── Projects ─────────────────────────────────────────────────

    /// Lists projects owned by `owner`, most recently updated first.
    async fn list_projects(&self, owner: UserId) -> BackendResult<Vec<ProjectRecord>>;

    /// Inserts a project row for `owner`.
    async fn insert_project(
        &self,
        owner: UserId,
        draft: ProjectDraft,
    ) -> BackendResult<ProjectRecord>;

    /// Applies a partial update and returns the updated row.
    async fn update_project(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> BackendResult<ProjectRecord>;

    /// Deletes a project. The backend cascades the delete to all of the
    /// project's issues.
    async fn delete_project(&self, id: ProjectId) -> BackendResult<()>;

    // ── Issues ───────────────────────────────────────────────────

    /// Lists a project's issues, most recently created first.
    async fn list_issues(&self, project: ProjectId) -> BackendResult<Vec<Issue>>;

    /// Inserts an issue row under `project`.
    async fn insert_issue(&self, project: ProjectId, draft: IssueDraft) -> BackendResult<Issue>;

    /// Applies a partial update by issue id and returns the updated row.
    async fn update_issue(&self, id: IssueId, patch: IssuePatch) -> BackendResult<Issue>;

    /// Deletes a single issue by id.
    async fn delete_issue(&self, id: IssueId) -> BackendResult<()>;
}
