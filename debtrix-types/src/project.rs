//! Projects and their nested issue lists.

use crate::ids::{ProjectId, UserId};
use crate::issue::Issue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project row as stored by the backend: no nested issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    /// Color tag shown on project cards.
    pub color: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    /// Materializes a draft into a record.
    #[must_use]
    pub fn from_draft(
        id: ProjectId,
        owner_id: UserId,
        draft: ProjectDraft,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            color: draft.color,
            owner_id,
            created_at: at,
            updated_at: at,
        }
    }

    /// Pairs the record with its issue list.
    #[must_use]
    pub fn with_issues(self, issues: Vec<Issue>) -> Project {
        Project {
            id: self.id,
            title: self.title,
            description: self.description,
            color: self.color,
            owner_id: self.owner_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            issues,
        }
    }
}

/// A project together with its UX debt records, as held by the web
/// application store. Owned by exactly one user; deleting the project
/// cascades to its issues (enforced by the backend).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub color: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Project {
    /// The backend-shaped record, without issues.
    #[must_use]
    pub fn record(&self) -> ProjectRecord {
        ProjectRecord {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            color: self.color.clone(),
            owner_id: self.owner_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Looks up an issue by id.
    #[must_use]
    pub fn issue(&self, id: crate::ids::IssueId) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id == id)
    }
}

/// Fields supplied when creating a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub color: String,
}

/// Partial update for a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProjectPatch {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the supplied fields into `record`.
    pub fn apply(&self, record: &mut ProjectRecord) {
        if let Some(v) = &self.title {
            record.title = v.clone();
        }
        if let Some(v) = &self.description {
            record.description = v.clone();
        }
        if let Some(v) = &self.color {
            record.color = v.clone();
        }
        if let Some(v) = self.updated_at {
            record.updated_at = v;
        }
    }
}
