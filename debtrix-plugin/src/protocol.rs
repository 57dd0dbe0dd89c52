//! Bridge message protocol between the plugin UI and the host.
//!
//! Request/response, not pub/sub: each UI-to-host message carries a
//! `type` tag from a closed set, each host-to-UI reply a mirrored tag
//! plus `success: true` with result fields or `success: false` with an
//! error string. There is no correlation id in v1 — the UI matches
//! replies by tag, so at most one outstanding request per type is safe
//! and the documented semantics for overlap are last-reply-wins. The
//! [`Envelope`] carries an optional `requestId` (echoed when present,
//! otherwise ignored) so correlation can be added later without
//! changing any message shape.
//!
//! Wire compatibility: tags are kebab-case, payload fields camelCase,
//! row payloads use the hosted schema's column names.

use crate::session::PluginConfig;
use debtrix_types::{Issue, IssueDraft, IssuePatch, ProjectId, ProjectRecord, UserProfile};
use serde::{Deserialize, Serialize};

/// Transport wrapper around a request or reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(
        rename = "requestId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub request_id: Option<String>,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Envelope<T> {
    /// Wraps a body with no correlation id.
    pub fn new(body: T) -> Self {
        Self {
            request_id: None,
            body,
        }
    }
}

/// Messages the UI sends to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiRequest {
    /// Ask for the cached endpoint configuration.
    LoadConfig,
    /// Cache endpoint configuration for later sessions.
    SaveConfig { config: PluginConfig },
    /// Verify a personal API key. The configuration may ride along in
    /// the same message or have been cached earlier.
    #[serde(rename_all = "camelCase")]
    VerifyApiKey {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_base_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anon_key: Option<String>,
    },
    /// List the verified user's projects.
    GetProjects,
    /// List a project's UX debt records.
    #[serde(rename_all = "camelCase")]
    GetUxDebts { project_id: ProjectId },
    /// Log a new UX debt record from the current document.
    #[serde(rename_all = "camelCase")]
    CreateUxDebt {
        project_id: ProjectId,
        debt_data: IssueDraft,
    },
    /// Partially update a record.
    #[serde(rename_all = "camelCase")]
    UpdateUxDebt {
        project_id: ProjectId,
        debt_id: debtrix_types::IssueId,
        debt_data: IssuePatch,
    },
    /// Delete a record.
    #[serde(rename_all = "camelCase")]
    DeleteUxDebt {
        project_id: ProjectId,
        debt_id: debtrix_types::IssueId,
    },
    /// Derive a deep link and selection metadata for the open document.
    GetDesignContext,
    /// Forget the stored key and configuration.
    Logout,
    /// Ask the host environment to close the plugin.
    ClosePlugin,
}

/// Document/selection metadata derived by the host. Never an error: a
/// missing document identifier degrades to a generic URL with
/// `fileKeyFound: false` instead of failing the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignContext {
    pub url: String,
    pub page_name: String,
    pub file_name: String,
    pub selected_nodes: usize,
    pub selected_node_names: Vec<String>,
    /// False when no document identifier was derivable from any source.
    pub file_key_found: bool,
}

/// Replies the host posts back to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostReply {
    /// Cached configuration, absent when none was ever saved.
    ConfigLoaded {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        config: Option<PluginConfig>,
    },
    /// A previously verified key was found in storage on startup.
    #[serde(rename_all = "camelCase")]
    ApiKeyLoaded { api_key: String },
    ApiKeyVerified {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user: Option<UserProfile>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    ProjectsLoaded {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        projects: Option<Vec<ProjectRecord>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    UxDebtsLoaded {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        debts: Option<Vec<Issue>>,
        /// Echoed so the UI can tell which project the rows belong to.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        project_id: Option<ProjectId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    UxDebtCreated {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        debt: Option<Issue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    UxDebtUpdated {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        debt: Option<Issue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    UxDebtDeleted {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    DesignContext { context: DesignContext },
    /// Catch-all for failures with no tagged counterpart.
    Error { error: String },
}

impl HostReply {
    pub fn api_key_verified(user: UserProfile) -> Self {
        HostReply::ApiKeyVerified {
            success: true,
            user: Some(user),
            error: None,
        }
    }

    pub fn verify_failed(error: impl Into<String>) -> Self {
        HostReply::ApiKeyVerified {
            success: false,
            user: None,
            error: Some(error.into()),
        }
    }

    pub fn projects_loaded(projects: Vec<ProjectRecord>) -> Self {
        HostReply::ProjectsLoaded {
            success: true,
            projects: Some(projects),
            error: None,
        }
    }

    pub fn projects_failed(error: impl Into<String>) -> Self {
        HostReply::ProjectsLoaded {
            success: false,
            projects: None,
            error: Some(error.into()),
        }
    }

    pub fn debts_loaded(project_id: ProjectId, debts: Vec<Issue>) -> Self {
        HostReply::UxDebtsLoaded {
            success: true,
            debts: Some(debts),
            project_id: Some(project_id),
            error: None,
        }
    }

    pub fn debts_failed(error: impl Into<String>) -> Self {
        HostReply::UxDebtsLoaded {
            success: false,
            debts: None,
            project_id: None,
            error: Some(error.into()),
        }
    }

    pub fn debt_created(debt: Issue) -> Self {
        HostReply::UxDebtCreated {
            success: true,
            debt: Some(debt),
            error: None,
        }
    }

    pub fn create_failed(error: impl Into<String>) -> Self {
        HostReply::UxDebtCreated {
            success: false,
            debt: None,
            error: Some(error.into()),
        }
    }

    pub fn debt_updated(debt: Issue) -> Self {
        HostReply::UxDebtUpdated {
            success: true,
            debt: Some(debt),
            error: None,
        }
    }

    pub fn update_failed(error: impl Into<String>) -> Self {
        HostReply::UxDebtUpdated {
            success: false,
            debt: None,
            error: Some(error.into()),
        }
    }

    pub fn debt_deleted() -> Self {
        HostReply::UxDebtDeleted {
            success: true,
            error: None,
        }
    }

    pub fn delete_failed(error: impl Into<String>) -> Self {
        HostReply::UxDebtDeleted {
            success: false,
            error: Some(error.into()),
        }
    }

    /// Whether the reply reports success. Replies with no failure shape
    /// (`config-loaded`, `api-key-loaded`, `design-context`) are always
    /// successful; `error` never is.
    #[must_use]
    pub fn success(&self) -> bool {
        match self {
            HostReply::ConfigLoaded { .. }
            | HostReply::ApiKeyLoaded { .. }
            | HostReply::DesignContext { .. } => true,
            HostReply::Error { .. } => false,
            HostReply::ApiKeyVerified { success, .. }
            | HostReply::ProjectsLoaded { success, .. }
            | HostReply::UxDebtsLoaded { success, .. }
            | HostReply::UxDebtCreated { success, .. }
            | HostReply::UxDebtUpdated { success, .. }
            | HostReply::UxDebtDeleted { success, .. } => *success,
        }
    }

    /// The error text, when the reply carries one.
    #[must_use]
    pub fn error_text(&self) -> Option<&str> {
        match self {
            HostReply::Error { error } => Some(error.as_str()),
            HostReply::ApiKeyVerified { error, .. }
            | HostReply::ProjectsLoaded { error, .. }
            | HostReply::UxDebtsLoaded { error, .. }
            | HostReply::UxDebtCreated { error, .. }
            | HostReply::UxDebtUpdated { error, .. }
            | HostReply::UxDebtDeleted { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}
