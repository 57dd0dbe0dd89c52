//! UX debt records and their lifecycle types.

use crate::ids::{IssueId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a UX debt record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    Heuristic,
    Accessibility,
    Performance,
    Visual,
    Usability,
}

impl IssueType {
    /// All categories, in display order.
    pub const ALL: [IssueType; 5] = [
        IssueType::Heuristic,
        IssueType::Accessibility,
        IssueType::Performance,
        IssueType::Visual,
        IssueType::Usability,
    ];
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IssueType::Heuristic => "Heuristic",
            IssueType::Accessibility => "Accessibility",
            IssueType::Performance => "Performance",
            IssueType::Visual => "Visual",
            IssueType::Usability => "Usability",
        };
        write!(f, "{s}")
    }
}

/// How urgent a record is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        };
        write!(f, "{s}")
    }
}

/// Resolution state of a record.
///
/// `InProgress` is spelled `"In Progress"` on the wire; the hosted
/// schema predates this crate and cannot be migrated from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl IssueStatus {
    /// All statuses, in kanban column order.
    pub const ALL: [IssueStatus; 3] = [
        IssueStatus::Open,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
    ];
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IssueStatus::Open => "Open",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Resolved => "Resolved",
        };
        write!(f, "{s}")
    }
}

/// A logged UX debt record. Belongs to exactly one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub project_id: ProjectId,
    pub title: String,
    /// Screen or component the record was logged against.
    pub screen: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub status: IssueStatus,
    pub description: String,
    pub recommendation: String,
    /// Display name of whoever logged the record.
    pub logged_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Deep link back into the design tool, when logged from the plugin.
    #[serde(
        rename = "figma_url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub link_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Materializes a draft into a full record. The id and timestamps
    /// come from whoever owns row creation (the backend).
    #[must_use]
    pub fn from_draft(
        id: IssueId,
        project_id: ProjectId,
        draft: IssueDraft,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            project_id,
            title: draft.title,
            screen: draft.screen,
            issue_type: draft.issue_type,
            severity: draft.severity,
            status: draft.status,
            description: draft.description,
            recommendation: draft.recommendation,
            logged_by: draft.logged_by,
            assignee: draft.assignee,
            link_url: draft.link_url,
            screenshot_url: draft.screenshot_url,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Fields supplied when creating a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueDraft {
    pub title: String,
    #[serde(default)]
    pub screen: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    #[serde(default = "default_status")]
    pub status: IssueStatus,
    pub description: String,
    pub recommendation: String,
    /// Filled in by the caller: the web form passes the signed-in user's
    /// name, the plugin host overwrites it with the verified user.
    #[serde(default)]
    pub logged_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(
        rename = "figma_url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub link_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
}

fn default_status() -> IssueStatus {
    IssueStatus::Open
}

/// Partial update for a record. Only supplied fields change; everything
/// else is left untouched (merge semantics, never replace).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssuePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub issue_type: Option<IssueType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(
        rename = "figma_url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub link_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl IssuePatch {
    /// A patch that only moves the record between kanban columns.
    #[must_use]
    pub fn status(status: IssueStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the supplied fields into `issue`.
    pub fn apply(&self, issue: &mut Issue) {
        if let Some(v) = &self.title {
            issue.title = v.clone();
        }
        if let Some(v) = &self.screen {
            issue.screen = v.clone();
        }
        if let Some(v) = self.issue_type {
            issue.issue_type = v;
        }
        if let Some(v) = self.severity {
            issue.severity = v;
        }
        if let Some(v) = self.status {
            issue.status = v;
        }
        if let Some(v) = &self.description {
            issue.description = v.clone();
        }
        if let Some(v) = &self.recommendation {
            issue.recommendation = v.clone();
        }
        if let Some(v) = &self.logged_by {
            issue.logged_by = v.clone();
        }
        if let Some(v) = &self.assignee {
            issue.assignee = Some(v.clone());
        }
        if let Some(v) = &self.link_url {
            issue.link_url = Some(v.clone());
        }
        if let Some(v) = &self.screenshot_url {
            issue.screenshot_url = Some(v.clone());
        }
        if let Some(v) = self.updated_at {
            issue.updated_at = v;
        }
    }
}
