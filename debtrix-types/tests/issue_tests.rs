use chrono::Utc;
use debtrix_types::{
    Issue, IssueDraft, IssueId, IssuePatch, IssueStatus, IssueType, ProjectId, Severity,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn draft(title: &str) -> IssueDraft {
    IssueDraft {
        title: title.to_string(),
        screen: "Checkout".to_string(),
        issue_type: IssueType::Usability,
        severity: Severity::Low,
        status: IssueStatus::Open,
        description: "Confusing flow".to_string(),
        recommendation: "Simplify".to_string(),
        logged_by: "Dana".to_string(),
        assignee: None,
        link_url: None,
        screenshot_url: None,
    }
}

fn issue(title: &str) -> Issue {
    Issue::from_draft(IssueId::new(), ProjectId::new(), draft(title), Utc::now())
}

// ── Wire spellings ───────────────────────────────────────────────

#[test]
fn in_progress_wire_spelling() {
    let json = serde_json::to_value(IssueStatus::InProgress).unwrap();
    assert_eq!(json, json!("In Progress"));

    let back: IssueStatus = serde_json::from_value(json!("In Progress")).unwrap();
    assert_eq!(back, IssueStatus::InProgress);
}

#[test]
fn issue_uses_schema_column_names() {
    let mut issue = issue("Tiny tap targets");
    issue.link_url = Some("https://example.test/file".to_string());
    let value = serde_json::to_value(&issue).unwrap();

    assert!(value.get("type").is_some());
    assert!(value.get("figma_url").is_some());
    assert!(value.get("logged_by").is_some());
    assert!(value.get("issue_type").is_none());
    assert!(value.get("link_url").is_none());
}

#[test]
fn draft_defaults_to_open() {
    let parsed: IssueDraft = serde_json::from_value(json!({
        "title": "Missing focus ring",
        "screen": "Login",
        "type": "Accessibility",
        "severity": "High",
        "description": "No visible focus",
        "recommendation": "Add outline"
    }))
    .unwrap();
    assert_eq!(parsed.status, IssueStatus::Open);
    assert_eq!(parsed.logged_by, "");
}

// ── Patch semantics ──────────────────────────────────────────────

#[test]
fn patch_merges_only_supplied_fields() {
    let mut subject = issue("A");
    let before = subject.clone();

    IssuePatch {
        severity: Some(Severity::High),
        ..IssuePatch::default()
    }
    .apply(&mut subject);

    assert_eq!(subject.title, "A");
    assert_eq!(subject.severity, Severity::High);
    assert_eq!(subject.description, before.description);
    assert_eq!(subject.updated_at, before.updated_at);
}

#[test]
fn status_patch_helper() {
    let patch = IssuePatch::status(IssueStatus::Resolved);
    assert_eq!(patch.status, Some(IssueStatus::Resolved));
    assert!(patch.title.is_none());
    assert!(!patch.is_empty());
    assert!(IssuePatch::default().is_empty());
}

#[test]
fn patch_serializes_only_set_fields() {
    let patch = IssuePatch::status(IssueStatus::Resolved);
    let value = serde_json::to_value(&patch).unwrap();
    assert_eq!(value, json!({"status": "Resolved"}));
}

#[test]
fn from_draft_copies_everything() {
    let id = IssueId::new();
    let project = ProjectId::new();
    let at = Utc::now();
    let built = Issue::from_draft(id, project, draft("Slow spinner"), at);

    assert_eq!(built.id, id);
    assert_eq!(built.project_id, project);
    assert_eq!(built.title, "Slow spinner");
    assert_eq!(built.created_at, at);
    assert_eq!(built.updated_at, at);
}
