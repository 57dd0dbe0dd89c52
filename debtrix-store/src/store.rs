//! The web application's project store.
//!
//! Owns the in-memory copy of the signed-in user's projects (each with
//! its nested issue list) and a materialized "current project" view.
//! Every mutation goes backend-first: the local commit only happens
//! once the backend call settles successfully, and both the project
//! list and the current-project view are updated from the same
//! response. On failure nothing is committed and the error is returned.
//!
//! Concurrency is settlement-order: the state lock is held only across
//! the local commit, never across the backend await, so two racing
//! mutations on the same row converge to whichever write settled last.

use crate::error::{StoreError, StoreResult};
use chrono::Utc;
use debtrix_backend::Backend;
use debtrix_types::{
    validate_credentials, validate_issue, validate_project, Issue, IssueDraft, IssueId, IssuePatch,
    Project, ProjectDraft, ProjectId, ProjectPatch, UserId, UserProfile,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Default)]
struct StoreState {
    user: Option<UserProfile>,
    projects: Vec<Project>,
    current: Option<Project>,
}

impl StoreState {
    /// Re-derives the current-project view from the list. Called after
    /// every commit so the two can never diverge in settled state.
    fn sync_current(&mut self) {
        if let Some(cur) = &self.current {
            let id = cur.id;
            self.current = self.projects.iter().find(|p| p.id == id).cloned();
        }
    }
}

/// In-memory store of the signed-in user's projects and issues.
pub struct ProjectStore {
    backend: Arc<dyn Backend>,
    state: RwLock<StoreState>,
}

impl ProjectStore {
    /// Creates a store over an injected backend.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: RwLock::new(StoreState::default()),
        }
    }

    // ── Sessions ─────────────────────────────────────────────────

    /// Signs in and performs the initial full load.
    pub async fn sign_in(&self, email: &str, password: &str) -> StoreResult<()> {
        let session = self.backend.sign_in(email, password).await?;
        let profile = self.load_profile(session.user_id, &session.email).await?;
        info!(user = %profile.id, "signed in");
        self.state.write().await.user = Some(profile);
        self.refresh().await
    }

    /// Signs up, creating the account, then performs the initial load.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> StoreResult<()> {
        validate_credentials(email, password, display_name)?;
        let session = self.backend.sign_up(email, password, display_name).await?;
        let profile = self.load_profile(session.user_id, &session.email).await?;
        info!(user = %profile.id, "signed up");
        self.state.write().await.user = Some(profile);
        self.refresh().await
    }

    /// Signs out and clears all state, including the selection.
    pub async fn sign_out(&self) -> StoreResult<()> {
        self.backend.sign_out().await?;
        *self.state.write().await = StoreState::default();
        info!("signed out");
        Ok(())
    }

    /// The signed-in user's profile, if any.
    pub async fn user(&self) -> Option<UserProfile> {
        self.state.read().await.user.clone()
    }

    /// Rotates the personal API key used by the design-tool plugin.
    pub async fn rotate_api_key(&self) -> StoreResult<String> {
        let user_id = self.require_user().await?;
        let key = self.backend.rotate_api_key(user_id).await?;
        if let Some(user) = self.state.write().await.user.as_mut() {
            user.api_key = Some(key.clone());
        }
        Ok(key)
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Snapshot of all loaded projects.
    pub async fn projects(&self) -> Vec<Project> {
        self.state.read().await.projects.clone()
    }

    /// The current-project view, if a selection exists.
    pub async fn current_project(&self) -> Option<Project> {
        self.state.read().await.current.clone()
    }

    /// Selects a project by id.
    pub async fn select_project(&self, id: ProjectId) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let project = state
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StoreError::UnknownProject(id))?;
        state.current = Some(project);
        Ok(())
    }

    /// Clears the selection.
    pub async fn clear_selection(&self) {
        self.state.write().await.current = None;
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Full reload from the backend: all projects, then each project's
    /// issues. Used on sign-in, on explicit user refresh, and when an
    /// operation cannot be applied incrementally.
    pub async fn refresh(&self) -> StoreResult<()> {
        let user_id = self.require_user().await?;
        let records = self.backend.list_projects(user_id).await?;
        let mut projects = Vec::with_capacity(records.len());
        for record in records {
            let issues = match self.backend.list_issues(record.id).await {
                Ok(issues) => issues,
                Err(err) => {
                    // One unreadable issue list should not sink the whole
                    // reload; the project shows up empty until the next one.
                    warn!(project = %record.id, %err, "issue load failed during refresh");
                    Vec::new()
                }
            };
            projects.push(record.with_issues(issues));
        }
        debug!(count = projects.len(), "projects refreshed");
        let mut state = self.state.write().await;
        state.projects = projects;
        state.sync_current();
        Ok(())
    }

    // ── Project mutations ────────────────────────────────────────

    /// Creates a project and appends it to the list.
    pub async fn add_project(&self, draft: ProjectDraft) -> StoreResult<Project> {
        validate_project(&draft)?;
        let user_id = self.require_user().await?;
        let record = self.backend.insert_project(user_id, draft).await?;
        let project = record.with_issues(Vec::new());
        let mut state = self.state.write().await;
        state.projects.insert(0, project.clone());
        state.sync_current();
        Ok(project)
    }

    /// Applies a partial update to a project. Stamps `updated_at`.
    pub async fn update_project(&self, id: ProjectId, mut patch: ProjectPatch) -> StoreResult<()> {
        patch.updated_at = Some(Utc::now());
        let record = self.backend.update_project(id, patch).await?;
        let mut state = self.state.write().await;
        match state.projects.iter().position(|p| p.id == id) {
            Some(pos) => {
                let issues = std::mem::take(&mut state.projects[pos].issues);
                state.projects[pos] = record.with_issues(issues);
                state.sync_current();
                Ok(())
            }
            None => {
                // Updated a row we do not hold; fall back to a full reload.
                drop(state);
                self.refresh().await
            }
        }
    }

    /// Deletes a project. The backend cascades to its issues; a selected
    /// project that is deleted clears the selection.
    pub async fn delete_project(&self, id: ProjectId) -> StoreResult<()> {
        self.backend.delete_project(id).await?;
        let mut state = self.state.write().await;
        state.projects.retain(|p| p.id != id);
        state.sync_current();
        debug!(project = %id, "project removed from store");
        Ok(())
    }

    // ── Issue mutations ──────────────────────────────────────────

    /// Creates an issue under `project_id` and appends it to that
    /// project's list. Stamps the owning project's `updated_at` from the
    /// same backend response.
    pub async fn add_issue(&self, project_id: ProjectId, draft: IssueDraft) -> StoreResult<Issue> {
        validate_issue(&draft)?;
        self.require_user().await?;
        let issue = self.backend.insert_issue(project_id, draft).await?;
        let mut state = self.state.write().await;
        match state.projects.iter().position(|p| p.id == project_id) {
            Some(pos) => {
                state.projects[pos].issues.insert(0, issue.clone());
                state.projects[pos].updated_at = issue.updated_at;
                state.sync_current();
                Ok(issue)
            }
            None => {
                drop(state);
                self.refresh().await?;
                Ok(issue)
            }
        }
    }

    /// Applies a partial update to an issue: only supplied fields change.
    /// Stamps the issue's and the owning project's `updated_at`.
    pub async fn update_issue(
        &self,
        project_id: ProjectId,
        issue_id: IssueId,
        mut patch: IssuePatch,
    ) -> StoreResult<()> {
        patch.updated_at = Some(Utc::now());
        let issue = self.backend.update_issue(issue_id, patch).await?;
        let mut state = self.state.write().await;
        let ppos = state
            .projects
            .iter()
            .position(|p| p.id == project_id)
            .ok_or(StoreError::UnknownProject(project_id))?;
        match state.projects[ppos].issues.iter().position(|i| i.id == issue_id) {
            Some(ipos) => {
                state.projects[ppos].updated_at = issue.updated_at;
                state.projects[ppos].issues[ipos] = issue;
                state.sync_current();
                Ok(())
            }
            None => {
                // Settled write for an issue we never loaded; reload instead.
                drop(state);
                self.refresh().await
            }
        }
    }

    /// Deletes exactly one issue from its project's list. Stamps the
    /// owning project's `updated_at`.
    pub async fn delete_issue(&self, project_id: ProjectId, issue_id: IssueId) -> StoreResult<()> {
        self.backend.delete_issue(issue_id).await?;
        let mut state = self.state.write().await;
        let ppos = state
            .projects
            .iter()
            .position(|p| p.id == project_id)
            .ok_or(StoreError::UnknownProject(project_id))?;
        match state.projects[ppos].issues.iter().position(|i| i.id == issue_id) {
            Some(ipos) => {
                state.projects[ppos].issues.remove(ipos);
                state.projects[ppos].updated_at = Utc::now();
                state.sync_current();
                Ok(())
            }
            None => {
                drop(state);
                self.refresh().await
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────

    async fn require_user(&self) -> StoreResult<UserId> {
        self.state
            .read()
            .await
            .user
            .as_ref()
            .map(|u| u.id)
            .ok_or(StoreError::NoSession)
    }

    async fn load_profile(&self, user_id: UserId, email: &str) -> StoreResult<UserProfile> {
        match self.backend.fetch_profile(user_id).await {
            Ok(profile) => Ok(profile),
            Err(debtrix_backend::BackendError::NotFound(_)) => {
                // First sign-in before the profile row landed: synthesize
                // one locally from the session rather than failing.
                let name = email.split('@').next().unwrap_or(email).to_string();
                Ok(UserProfile::new(user_id, email, name))
            }
            Err(err) => Err(err.into()),
        }
    }
}
