use debtrix_backend::{Backend, BackendError, MemoryBackend};
use debtrix_store::{ProjectStore, StoreError};
use debtrix_types::{
    IssueDraft, IssuePatch, IssueStatus, IssueType, Project, ProjectDraft, ProjectId, ProjectPatch,
    Severity,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn project_draft(title: &str) -> ProjectDraft {
    ProjectDraft {
        title: title.to_string(),
        description: "desc".to_string(),
        color: "#4F46E5".to_string(),
    }
}

fn issue_draft(title: &str) -> IssueDraft {
    IssueDraft {
        title: title.to_string(),
        screen: "Settings".to_string(),
        issue_type: IssueType::Usability,
        severity: Severity::Low,
        status: IssueStatus::Open,
        description: "Hard to find".to_string(),
        recommendation: "Surface it".to_string(),
        logged_by: "Dana".to_string(),
        assignee: None,
        link_url: None,
        screenshot_url: None,
    }
}

async fn signed_in_store() -> (Arc<MemoryBackend>, ProjectStore) {
    let backend = Arc::new(MemoryBackend::new());
    let store = ProjectStore::new(backend.clone());
    store
        .sign_up("dana@example.com", "hunter22", "Dana")
        .await
        .unwrap();
    (backend, store)
}

/// The current-project view must be structurally equal to its list
/// entry whenever state is settled.
async fn assert_current_in_sync(store: &ProjectStore) {
    let current = store.current_project().await;
    if let Some(current) = current {
        let listed: Option<Project> = store
            .projects()
            .await
            .into_iter()
            .find(|p| p.id == current.id);
        assert_eq!(listed.as_ref(), Some(&current));
    }
}

// ── Sessions ─────────────────────────────────────────────────────

#[tokio::test]
async fn operations_require_a_session() {
    let backend = Arc::new(MemoryBackend::new());
    let store = ProjectStore::new(backend);

    let err = store.add_project(project_draft("P")).await.unwrap_err();
    assert_eq!(err, StoreError::NoSession);
    assert!(store.projects().await.is_empty());
}

#[tokio::test]
async fn sign_in_loads_existing_projects() {
    let backend = Arc::new(MemoryBackend::new());
    let session = backend
        .sign_up("dana@example.com", "hunter22", "Dana")
        .await
        .unwrap();
    let record = backend
        .insert_project(session.user_id, project_draft("Existing"))
        .await
        .unwrap();
    backend
        .insert_issue(record.id, issue_draft("Pre-existing"))
        .await
        .unwrap();
    backend.sign_out().await.unwrap();

    let store = ProjectStore::new(backend);
    store.sign_in("dana@example.com", "hunter22").await.unwrap();

    let projects = store.projects().await;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].title, "Existing");
    assert_eq!(projects[0].issues.len(), 1);
    assert_eq!(store.user().await.unwrap().email, "dana@example.com");
}

#[tokio::test]
async fn sign_up_rejects_bad_credentials_locally() {
    let backend = Arc::new(MemoryBackend::new());
    let store = ProjectStore::new(backend);

    let err = store.sign_up("not-an-email", "hunter22", "Dana").await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn sign_out_clears_everything() {
    let (_backend, store) = signed_in_store().await;
    let project = store.add_project(project_draft("P")).await.unwrap();
    store.select_project(project.id).await.unwrap();

    store.sign_out().await.unwrap();

    assert_eq!(store.user().await, None);
    assert!(store.projects().await.is_empty());
    assert_eq!(store.current_project().await, None);
}

#[tokio::test]
async fn rotate_api_key_lands_on_profile() {
    let (_backend, store) = signed_in_store().await;
    let key = store.rotate_api_key().await.unwrap();
    assert_eq!(store.user().await.unwrap().api_key, Some(key));
}

// ── Selection ────────────────────────────────────────────────────

#[tokio::test]
async fn select_unknown_project_fails() {
    let (_backend, store) = signed_in_store().await;
    let stray = ProjectId::new();
    let err = store.select_project(stray).await.unwrap_err();
    assert_eq!(err, StoreError::UnknownProject(stray));
}

#[tokio::test]
async fn deleting_selected_project_clears_selection() {
    let (_backend, store) = signed_in_store().await;
    let keep = store.add_project(project_draft("keep")).await.unwrap();
    let gone = store.add_project(project_draft("gone")).await.unwrap();
    store.select_project(gone.id).await.unwrap();

    store.delete_project(gone.id).await.unwrap();

    assert_eq!(store.current_project().await, None);
    assert_eq!(store.projects().await.iter().map(|p| p.id).collect::<Vec<_>>(), vec![keep.id]);
}

// ── Derived-state synchronization ────────────────────────────────

#[tokio::test]
async fn current_tracks_list_through_every_mutation() {
    let (_backend, store) = signed_in_store().await;
    let project = store.add_project(project_draft("Tracked")).await.unwrap();
    store.select_project(project.id).await.unwrap();
    assert_current_in_sync(&store).await;

    store
        .update_project(
            project.id,
            ProjectPatch {
                title: Some("Tracked v2".to_string()),
                ..ProjectPatch::default()
            },
        )
        .await
        .unwrap();
    assert_current_in_sync(&store).await;
    assert_eq!(store.current_project().await.unwrap().title, "Tracked v2");

    let issue = store.add_issue(project.id, issue_draft("I")).await.unwrap();
    assert_current_in_sync(&store).await;
    assert_eq!(store.current_project().await.unwrap().issues.len(), 1);

    store
        .update_issue(project.id, issue.id, IssuePatch::status(IssueStatus::Resolved))
        .await
        .unwrap();
    assert_current_in_sync(&store).await;
    assert_eq!(
        store.current_project().await.unwrap().issues[0].status,
        IssueStatus::Resolved
    );

    store.delete_issue(project.id, issue.id).await.unwrap();
    assert_current_in_sync(&store).await;
    assert!(store.current_project().await.unwrap().issues.is_empty());

    store.refresh().await.unwrap();
    assert_current_in_sync(&store).await;
}

#[tokio::test]
async fn new_projects_appear_first() {
    let (_backend, store) = signed_in_store().await;
    store.add_project(project_draft("first")).await.unwrap();
    store.add_project(project_draft("second")).await.unwrap();

    let titles: Vec<String> = store.projects().await.into_iter().map(|p| p.title).collect();
    assert_eq!(titles, vec!["second".to_string(), "first".to_string()]);
}

// ── Partial updates ──────────────────────────────────────────────

#[tokio::test]
async fn issue_patch_touches_only_supplied_fields() {
    let (_backend, store) = signed_in_store().await;
    let project = store.add_project(project_draft("P")).await.unwrap();
    let issue = store.add_issue(project.id, issue_draft("Original")).await.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    store
        .update_issue(
            project.id,
            issue.id,
            IssuePatch {
                severity: Some(Severity::Critical),
                ..IssuePatch::default()
            },
        )
        .await
        .unwrap();

    let updated = store.projects().await[0].issues[0].clone();
    assert_eq!(updated.title, "Original");
    assert_eq!(updated.severity, Severity::Critical);
    assert!(updated.updated_at > issue.updated_at);
}

#[tokio::test]
async fn issue_mutation_stamps_owning_project() {
    let (_backend, store) = signed_in_store().await;
    let project = store.add_project(project_draft("P")).await.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    let issue = store.add_issue(project.id, issue_draft("I")).await.unwrap();

    let held = store.projects().await[0].clone();
    assert!(held.updated_at > project.updated_at);
    assert_eq!(held.updated_at, issue.updated_at);
}

#[tokio::test]
async fn update_issue_for_unknown_project_fails() {
    let (_backend, store) = signed_in_store().await;
    let project = store.add_project(project_draft("P")).await.unwrap();
    let issue = store.add_issue(project.id, issue_draft("I")).await.unwrap();

    let stray = ProjectId::new();
    let err = store
        .update_issue(stray, issue.id, IssuePatch::status(IssueStatus::Resolved))
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::UnknownProject(stray));
}

// ── Validation ───────────────────────────────────────────────────

#[tokio::test]
async fn invalid_draft_never_reaches_the_backend() {
    let (backend, store) = signed_in_store().await;
    // A pending fault proves no backend call happens: the fault would
    // surface as a Backend error, not a Validation one.
    backend.fail_next(BackendError::Network("boom".into())).await;

    let err = store.add_project(project_draft("   ")).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(store.projects().await.is_empty());
}

// ── Failure handling ─────────────────────────────────────────────

#[tokio::test]
async fn backend_failure_leaves_state_untouched() {
    let (backend, store) = signed_in_store().await;
    let project = store.add_project(project_draft("Stable")).await.unwrap();
    store.select_project(project.id).await.unwrap();
    let before_projects = store.projects().await;
    let before_current = store.current_project().await;

    backend
        .fail_next(BackendError::Network("connection reset".into()))
        .await;
    let err = store
        .update_project(
            project.id,
            ProjectPatch {
                title: Some("Never lands".to_string()),
                ..ProjectPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::Backend(BackendError::Network("connection reset".into()))
    );

    assert_eq!(store.projects().await, before_projects);
    assert_eq!(store.current_project().await, before_current);
}

#[tokio::test]
async fn failed_issue_create_adds_nothing() {
    let (backend, store) = signed_in_store().await;
    let project = store.add_project(project_draft("P")).await.unwrap();

    backend
        .fail_next(BackendError::Query("row level security".into()))
        .await;
    assert!(store.add_issue(project.id, issue_draft("I")).await.is_err());
    assert!(store.projects().await[0].issues.is_empty());
}

// ── Write convergence ────────────────────────────────────────────

#[tokio::test]
async fn sequential_status_updates_converge_to_last_write() {
    let (_backend, store) = signed_in_store().await;
    let project = store.add_project(project_draft("P")).await.unwrap();
    let issue = store.add_issue(project.id, issue_draft("I")).await.unwrap();
    store.select_project(project.id).await.unwrap();

    for status in [
        IssueStatus::InProgress,
        IssueStatus::Resolved,
        IssueStatus::Open,
        IssueStatus::InProgress,
    ] {
        store
            .update_issue(project.id, issue.id, IssuePatch::status(status))
            .await
            .unwrap();
    }

    assert_eq!(
        store.projects().await[0].issues[0].status,
        IssueStatus::InProgress
    );
    assert_current_in_sync(&store).await;
}
