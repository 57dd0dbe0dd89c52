//! In-memory backend implementation.
//!
//! HashMap-backed stand-in for the hosted service. Sessions, ownership,
//! and the project→issue cascade behave like production; `fail_next`
//! lets tests force the next call to fail at the operation boundary.

use crate::error::{BackendError, BackendResult};
use crate::{Backend, Session};
use async_trait::async_trait;
use chrono::Utc;
use debtrix_types::{
    Issue, IssueDraft, IssueId, IssuePatch, ProjectDraft, ProjectId, ProjectPatch, ProjectRecord,
    UserId, UserProfile,
};
use std::collections::HashMap;
use tokio::sync::{watch, RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    profiles: HashMap<UserId, UserProfile>,
    /// email → (user, password)
    credentials: HashMap<String, (UserId, String)>,
    projects: HashMap<ProjectId, ProjectRecord>,
    issues: HashMap<IssueId, Issue>,
    session: Option<Session>,
    fail_next: Option<BackendError>,
}

/// In-memory [`Backend`] implementation.
pub struct MemoryBackend {
    inner: RwLock<Inner>,
    session_tx: watch::Sender<Option<Session>>,
}

impl MemoryBackend {
    /// Creates an empty backend with no users and no session.
    #[must_use]
    pub fn new() -> Self {
        let (session_tx, _) = watch::channel(None);
        Self {
            inner: RwLock::new(Inner::default()),
            session_tx,
        }
    }

    /// Forces the next backend call to fail with `err`.
    pub async fn fail_next(&self, err: BackendError) {
        self.inner.write().await.fail_next = Some(err);
    }

    /// Number of issue rows currently stored, across all projects.
    pub async fn issue_count(&self) -> usize {
        self.inner.read().await.issues.len()
    }

    async fn take_fault(&self) -> BackendResult<()> {
        if let Some(err) = self.inner.write().await.fail_next.take() {
            return Err(err);
        }
        Ok(())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session> {
        self.take_fault().await?;
        let mut inner = self.inner.write().await;
        let (user_id, stored) = inner
            .credentials
            .get(email)
            .cloned()
            .ok_or_else(|| BackendError::Auth("Invalid login credentials".into()))?;
        if stored != password {
            return Err(BackendError::Auth("Invalid login credentials".into()));
        }
        let session = Session {
            user_id,
            email: email.to_string(),
        };
        inner.session = Some(session.clone());
        let _ = self.session_tx.send(Some(session.clone()));
        debug!(user = %user_id, "signed in");
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> BackendResult<Session> {
        self.take_fault().await?;
        let mut inner = self.inner.write().await;
        if inner.credentials.contains_key(email) {
            return Err(BackendError::Conflict(format!(
                "user already registered: {email}"
            )));
        }
        let user_id = UserId::new();
        inner
            .credentials
            .insert(email.to_string(), (user_id, password.to_string()));
        inner
            .profiles
            .insert(user_id, UserProfile::new(user_id, email, display_name));
        let session = Session {
            user_id,
            email: email.to_string(),
        };
        inner.session = Some(session.clone());
        let _ = self.session_tx.send(Some(session.clone()));
        debug!(user = %user_id, "signed up");
        Ok(session)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        self.take_fault().await?;
        self.inner.write().await.session = None;
        let _ = self.session_tx.send(None);
        Ok(())
    }

    async fn session(&self) -> Option<Session> {
        self.inner.read().await.session.clone()
    }

    fn subscribe_session(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }

    async fn fetch_profile(&self, user: UserId) -> BackendResult<UserProfile> {
        self.take_fault().await?;
        self.inner
            .read()
            .await
            .profiles
            .get(&user)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("profile {user}")))
    }

    async fn rotate_api_key(&self, user: UserId) -> BackendResult<String> {
        self.take_fault().await?;
        let mut inner = self.inner.write().await;
        let profile = inner
            .profiles
            .get_mut(&user)
            .ok_or_else(|| BackendError::NotFound(format!("profile {user}")))?;
        let key = format!("dbx_{}", Uuid::new_v4().simple());
        profile.api_key = Some(key.clone());
        Ok(key)
    }

    async fn list_projects(&self, owner: UserId) -> BackendResult<Vec<ProjectRecord>> {
        self.take_fault().await?;
        let inner = self.inner.read().await;
        let mut rows: Vec<ProjectRecord> = inner
            .projects
            .values()
            .filter(|p| p.owner_id == owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    async fn insert_project(
        &self,
        owner: UserId,
        draft: ProjectDraft,
    ) -> BackendResult<ProjectRecord> {
        self.take_fault().await?;
        let record = ProjectRecord::from_draft(ProjectId::new(), owner, draft, Utc::now());
        self.inner
            .write()
            .await
            .projects
            .insert(record.id, record.clone());
        debug!(project = %record.id, "project inserted");
        Ok(record)
    }

    async fn update_project(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> BackendResult<ProjectRecord> {
        self.take_fault().await?;
        let mut inner = self.inner.write().await;
        let record = inner
            .projects
            .get_mut(&id)
            .ok_or_else(|| BackendError::NotFound(format!("project {id}")))?;
        patch.apply(record);
        Ok(record.clone())
    }

    async fn delete_project(&self, id: ProjectId) -> BackendResult<()> {
        self.take_fault().await?;
        let mut inner = self.inner.write().await;
        inner.projects.remove(&id);
        // Cascade, as the hosted schema's foreign key does.
        inner.issues.retain(|_, issue| issue.project_id != id);
        debug!(project = %id, "project deleted");
        Ok(())
    }

    async fn list_issues(&self, project: ProjectId) -> BackendResult<Vec<Issue>> {
        self.take_fault().await?;
        let inner = self.inner.read().await;
        let mut rows: Vec<Issue> = inner
            .issues
            .values()
            .filter(|i| i.project_id == project)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_issue(&self, project: ProjectId, draft: IssueDraft) -> BackendResult<Issue> {
        self.take_fault().await?;
        let mut inner = self.inner.write().await;
        if !inner.projects.contains_key(&project) {
            return Err(BackendError::NotFound(format!("project {project}")));
        }
        let issue = Issue::from_draft(IssueId::new(), project, draft, Utc::now());
        inner.issues.insert(issue.id, issue.clone());
        debug!(issue = %issue.id, project = %project, "issue inserted");
        Ok(issue)
    }

    async fn update_issue(&self, id: IssueId, patch: IssuePatch) -> BackendResult<Issue> {
        self.take_fault().await?;
        let mut inner = self.inner.write().await;
        let issue = inner
            .issues
            .get_mut(&id)
            .ok_or_else(|| BackendError::NotFound(format!("issue {id}")))?;
        patch.apply(issue);
        Ok(issue.clone())
    }

    async fn delete_issue(&self, id: IssueId) -> BackendResult<()> {
        self.take_fault().await?;
        self.inner.write().await.issues.remove(&id);
        Ok(())
    }
}
