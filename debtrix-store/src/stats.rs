//! Dashboard and analytics aggregation.
//!
//! Pure functions over already-loaded projects; nothing here touches
//! the backend.

use debtrix_types::{IssueStatus, IssueType, Project, ProjectId, Severity};
use serde::Serialize;
use std::collections::HashMap;

/// Issue counts per resolution status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl StatusCounts {
    fn bump(&mut self, status: IssueStatus) {
        match status {
            IssueStatus::Open => self.open += 1,
            IssueStatus::InProgress => self.in_progress += 1,
            IssueStatus::Resolved => self.resolved += 1,
        }
    }
}

/// Issue counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl SeverityCounts {
    fn bump(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
            Severity::Critical => self.critical += 1,
        }
    }
}

/// Workspace-wide debt summary shown on the analytics view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DebtSummary {
    pub projects: usize,
    pub total: usize,
    pub status: StatusCounts,
    pub severity: SeverityCounts,
    pub by_type: HashMap<IssueType, usize>,
}

impl DebtSummary {
    /// Aggregates across all loaded projects.
    #[must_use]
    pub fn collect(projects: &[Project]) -> Self {
        let mut summary = Self {
            projects: projects.len(),
            ..Self::default()
        };
        for project in projects {
            for issue in &project.issues {
                summary.total += 1;
                summary.status.bump(issue.status);
                summary.severity.bump(issue.severity);
                *summary.by_type.entry(issue.issue_type).or_default() += 1;
            }
        }
        summary
    }

    /// Fraction of records resolved, in percent. Zero when empty.
    #[must_use]
    pub fn resolution_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.status.resolved as f64 / self.total as f64 * 100.0
    }
}

/// Per-project breakdown for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectBreakdown {
    pub id: ProjectId,
    pub title: String,
    pub total: usize,
    pub status: StatusCounts,
    pub severity: SeverityCounts,
}

/// Breaks every project down by status and severity.
#[must_use]
pub fn per_project(projects: &[Project]) -> Vec<ProjectBreakdown> {
    projects
        .iter()
        .map(|project| {
            let mut status = StatusCounts::default();
            let mut severity = SeverityCounts::default();
            for issue in &project.issues {
                status.bump(issue.status);
                severity.bump(issue.severity);
            }
            ProjectBreakdown {
                id: project.id,
                title: project.title.clone(),
                total: project.issues.len(),
                status,
                severity,
            }
        })
        .collect()
}
