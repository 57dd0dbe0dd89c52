//! Core type definitions for the Debtrix client core.
//!
//! Entities are backend-agnostic: the hosted store is the system of
//! record, these types are the in-memory and wire representations the
//! web store and the plugin host share. Wire field names follow the
//! hosted schema (snake_case columns, `"In Progress"` status spelling).

pub mod ids;
pub mod issue;
pub mod profile;
pub mod project;
pub mod validate;

pub use ids::{IssueId, ProjectId, UserId};
pub use issue::{Issue, IssueDraft, IssuePatch, IssueStatus, IssueType, Severity};
pub use profile::UserProfile;
pub use project::{Project, ProjectDraft, ProjectPatch, ProjectRecord};
pub use validate::{validate_credentials, validate_issue, validate_project, ValidationError};
