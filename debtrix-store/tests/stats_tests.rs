use chrono::Utc;
use debtrix_store::{per_project, DebtSummary};
use debtrix_types::{
    Issue, IssueDraft, IssueId, IssueStatus, IssueType, Project, ProjectDraft, ProjectId,
    ProjectRecord, Severity, UserId,
};
use pretty_assertions::assert_eq;

fn issue(
    project: ProjectId,
    issue_type: IssueType,
    severity: Severity,
    status: IssueStatus,
) -> Issue {
    Issue::from_draft(
        IssueId::new(),
        project,
        IssueDraft {
            title: "t".to_string(),
            screen: "s".to_string(),
            issue_type,
            severity,
            status,
            description: String::new(),
            recommendation: String::new(),
            logged_by: "Dana".to_string(),
            assignee: None,
            link_url: None,
            screenshot_url: None,
        },
        Utc::now(),
    )
}

fn project(title: &str, issues: Vec<Issue>) -> Project {
    ProjectRecord::from_draft(
        issues.first().map(|i| i.project_id).unwrap_or_else(ProjectId::new),
        UserId::new(),
        ProjectDraft {
            title: title.to_string(),
            description: String::new(),
            color: "#000".to_string(),
        },
        Utc::now(),
    )
    .with_issues(issues)
}

fn sample() -> Vec<Project> {
    let a = ProjectId::new();
    let b = ProjectId::new();
    vec![
        project(
            "A",
            vec![
                issue(a, IssueType::Usability, Severity::High, IssueStatus::Open),
                issue(a, IssueType::Usability, Severity::Low, IssueStatus::Resolved),
                issue(a, IssueType::Visual, Severity::Critical, IssueStatus::InProgress),
            ],
        ),
        project(
            "B",
            vec![issue(b, IssueType::Accessibility, Severity::Medium, IssueStatus::Resolved)],
        ),
    ]
}

#[test]
fn summary_counts_across_projects() {
    let summary = DebtSummary::collect(&sample());

    assert_eq!(summary.projects, 2);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.status.open, 1);
    assert_eq!(summary.status.in_progress, 1);
    assert_eq!(summary.status.resolved, 2);
    assert_eq!(summary.severity.low, 1);
    assert_eq!(summary.severity.medium, 1);
    assert_eq!(summary.severity.high, 1);
    assert_eq!(summary.severity.critical, 1);
    assert_eq!(summary.by_type.get(&IssueType::Usability), Some(&2));
    assert_eq!(summary.by_type.get(&IssueType::Visual), Some(&1));
    assert_eq!(summary.by_type.get(&IssueType::Performance), None);
}

#[test]
fn resolution_rate_in_percent() {
    let summary = DebtSummary::collect(&sample());
    assert_eq!(summary.resolution_rate(), 50.0);
}

#[test]
fn empty_workspace_rates_zero() {
    let summary = DebtSummary::collect(&[]);
    assert_eq!(summary.total, 0);
    assert_eq!(summary.resolution_rate(), 0.0);
}

#[test]
fn per_project_breakdown_preserves_order() {
    let breakdown = per_project(&sample());

    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].title, "A");
    assert_eq!(breakdown[0].total, 3);
    assert_eq!(breakdown[0].status.resolved, 1);
    assert_eq!(breakdown[0].severity.critical, 1);
    assert_eq!(breakdown[1].title, "B");
    assert_eq!(breakdown[1].total, 1);
    assert_eq!(breakdown[1].status.resolved, 1);
}

#[test]
fn project_without_issues_counts_zero() {
    let projects = vec![project("Empty", Vec::new())];
    let breakdown = per_project(&projects);
    assert_eq!(breakdown[0].total, 0);
    assert_eq!(breakdown[0].status, Default::default());
}
