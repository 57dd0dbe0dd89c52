//! UI-side bridge state.
//!
//! The iframe UI holds no authoritative state: everything it shows is a
//! disposable cache rebuilt from the last reply of each type. With no
//! correlation id in v1, replies settle requests by type tag alone, so
//! when two requests of the same type overlap the model ends up showing
//! whichever reply arrived last. That is the specified behavior, not a
//! defect; [`BridgeState`] makes it explicit and testable.

use crate::protocol::{DesignContext, HostReply, UiRequest};
use crate::session::PluginConfig;
use debtrix_types::{Issue, ProjectId, ProjectRecord, UserProfile};
use std::collections::HashMap;

/// The closed set of request types, used as the settlement key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    LoadConfig,
    SaveConfig,
    VerifyApiKey,
    GetProjects,
    GetUxDebts,
    CreateUxDebt,
    UpdateUxDebt,
    DeleteUxDebt,
    GetDesignContext,
    Logout,
    ClosePlugin,
}

impl UiRequest {
    /// The request's settlement key.
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            UiRequest::LoadConfig => RequestKind::LoadConfig,
            UiRequest::SaveConfig { .. } => RequestKind::SaveConfig,
            UiRequest::VerifyApiKey { .. } => RequestKind::VerifyApiKey,
            UiRequest::GetProjects => RequestKind::GetProjects,
            UiRequest::GetUxDebts { .. } => RequestKind::GetUxDebts,
            UiRequest::CreateUxDebt { .. } => RequestKind::CreateUxDebt,
            UiRequest::UpdateUxDebt { .. } => RequestKind::UpdateUxDebt,
            UiRequest::DeleteUxDebt { .. } => RequestKind::DeleteUxDebt,
            UiRequest::GetDesignContext => RequestKind::GetDesignContext,
            UiRequest::Logout => RequestKind::Logout,
            UiRequest::ClosePlugin => RequestKind::ClosePlugin,
        }
    }
}

impl HostReply {
    /// The request kind this reply settles. Unsolicited replies
    /// (`api-key-loaded`, `error`) settle nothing.
    #[must_use]
    pub fn settles(&self) -> Option<RequestKind> {
        match self {
            HostReply::ConfigLoaded { .. } => Some(RequestKind::LoadConfig),
            HostReply::ApiKeyVerified { .. } => Some(RequestKind::VerifyApiKey),
            HostReply::ProjectsLoaded { .. } => Some(RequestKind::GetProjects),
            HostReply::UxDebtsLoaded { .. } => Some(RequestKind::GetUxDebts),
            HostReply::UxDebtCreated { .. } => Some(RequestKind::CreateUxDebt),
            HostReply::UxDebtUpdated { .. } => Some(RequestKind::UpdateUxDebt),
            HostReply::UxDebtDeleted { .. } => Some(RequestKind::DeleteUxDebt),
            HostReply::DesignContext { .. } => Some(RequestKind::GetDesignContext),
            HostReply::ApiKeyLoaded { .. } | HostReply::Error { .. } => None,
        }
    }
}

/// Lifecycle of one request type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestPhase {
    /// No request of this type in flight.
    #[default]
    Idle,
    /// Sent; the host is executing. A second dispatch in this phase is
    /// allowed and resolves last-reply-wins.
    Dispatched,
}

/// Rendering cache rebuilt purely from replies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiModel {
    pub config: Option<PluginConfig>,
    pub api_key: Option<String>,
    pub user: Option<UserProfile>,
    pub projects: Vec<ProjectRecord>,
    pub debts: Vec<Issue>,
    /// Which project `debts` belongs to.
    pub debts_project: Option<ProjectId>,
    pub context: Option<DesignContext>,
    pub last_error: Option<String>,
}

/// Per-type request tracking plus the UI model.
#[derive(Debug, Clone, Default)]
pub struct BridgeState {
    phases: HashMap<RequestKind, RequestPhase>,
    pub model: UiModel,
}

impl BridgeState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the request's type as in flight.
    pub fn dispatch(&mut self, request: &UiRequest) {
        self.phases.insert(request.kind(), RequestPhase::Dispatched);
    }

    /// Current phase for a request type.
    #[must_use]
    pub fn phase(&self, kind: RequestKind) -> RequestPhase {
        self.phases.get(&kind).copied().unwrap_or_default()
    }

    /// Applies a reply: settles the matching type back to Idle and
    /// overwrites the model from the payload. Later replies of the same
    /// type simply overwrite earlier ones.
    pub fn apply(&mut self, reply: &HostReply) {
        if let Some(kind) = reply.settles() {
            self.phases.insert(kind, RequestPhase::Idle);
        }
        match reply {
            HostReply::ConfigLoaded { config } => {
                self.model.config = config.clone();
            }
            HostReply::ApiKeyLoaded { api_key } => {
                self.model.api_key = Some(api_key.clone());
            }
            HostReply::ApiKeyVerified { user, error, .. } => {
                self.model.user = user.clone();
                self.model.last_error = error.clone();
            }
            HostReply::ProjectsLoaded {
                success,
                projects,
                error,
            } => {
                if *success {
                    self.model.projects = projects.clone().unwrap_or_default();
                }
                self.model.last_error = error.clone();
            }
            HostReply::UxDebtsLoaded {
                success,
                debts,
                project_id,
                error,
            } => {
                if *success {
                    self.model.debts = debts.clone().unwrap_or_default();
                    self.model.debts_project = *project_id;
                }
                self.model.last_error = error.clone();
            }
            HostReply::UxDebtCreated {
                success,
                debt,
                error,
            } => {
                if *success {
                    if let Some(debt) = debt {
                        if self.model.debts_project == Some(debt.project_id) {
                            self.model.debts.insert(0, debt.clone());
                        }
                    }
                }
                self.model.last_error = error.clone();
            }
            HostReply::UxDebtUpdated {
                success,
                debt,
                error,
            } => {
                if *success {
                    if let Some(debt) = debt {
                        if let Some(entry) =
                            self.model.debts.iter_mut().find(|d| d.id == debt.id)
                        {
                            *entry = debt.clone();
                        }
                    }
                }
                self.model.last_error = error.clone();
            }
            HostReply::UxDebtDeleted { error, .. } => {
                self.model.last_error = error.clone();
            }
            HostReply::DesignContext { context } => {
                self.model.context = Some(context.clone());
            }
            HostReply::Error { error } => {
                self.model.last_error = Some(error.clone());
            }
        }
    }
}
