//! The privileged side of the bridge.
//!
//! [`PluginHost`] dispatches every UI request, performs the HTTP and
//! storage work the sandboxed UI cannot, and produces the mirrored
//! reply. All failures are caught at this boundary and flattened to the
//! reply's failure shape; the UI never sees a raw transport error.

use crate::context::derive_design_context;
use crate::env::HostEnv;
use crate::error::{PluginError, PluginResult};
use crate::protocol::{Envelope, HostReply, UiRequest};
use crate::rest::RestClient;
use crate::session::{PluginConfig, PluginSession};
use debtrix_types::{
    Issue, IssueDraft, IssueId, IssuePatch, IssueStatus, ProjectId, ProjectRecord, UserProfile,
};
use tracing::{debug, info, warn};

/// Storage key holding the raw personal API key.
pub const KEY_API_KEY: &str = "debtrix_api_key";
/// Storage key holding the JSON-serialized endpoint configuration.
pub const KEY_CONFIG: &str = "debtrix_config";

/// Plugin host: owns the session, the REST client, and the injected
/// host environment.
pub struct PluginHost<E: HostEnv> {
    env: E,
    rest: RestClient,
    session: PluginSession,
}

impl<E: HostEnv> PluginHost<E> {
    /// Creates a host with a fresh session.
    pub fn new(env: E) -> Self {
        Self {
            env,
            rest: RestClient::new(),
            session: PluginSession::default(),
        }
    }

    /// Read access to the session, mainly for tests.
    pub fn session(&self) -> &PluginSession {
        &self.session
    }

    /// The injected environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Startup sequence: restore cached configuration and key from
    /// storage and emit the corresponding unsolicited replies. The key
    /// is only restored when a configuration is also present, and the
    /// verified user is never restored — the UI re-verifies the key.
    pub async fn startup(&mut self) -> Vec<HostReply> {
        let mut replies = Vec::new();
        let stored_config = self
            .env
            .storage_get(KEY_CONFIG)
            .await
            .and_then(|raw| serde_json::from_str::<PluginConfig>(&raw).ok());
        if let Some(config) = stored_config.clone() {
            self.session.config = Some(config.clone());
            replies.push(HostReply::ConfigLoaded {
                config: Some(config),
            });
        }
        if let Some(key) = self.env.storage_get(KEY_API_KEY).await {
            if stored_config.is_some() {
                self.session.api_key = Some(key.clone());
                replies.push(HostReply::ApiKeyLoaded { api_key: key });
            }
        }
        info!(restored = replies.len(), "plugin host started");
        replies
    }

    /// Dispatches one request. Requests with no reply shape
    /// (`save-config`, `logout`, `close-plugin`) return `None`.
    pub async fn handle(&mut self, request: UiRequest) -> Option<HostReply> {
        // Log the tag only; verify-api-key payloads carry the credential.
        debug!(kind = ?request.kind(), "dispatching");
        match request {
            UiRequest::LoadConfig => Some(self.load_config().await),
            UiRequest::SaveConfig { config } => {
                self.save_config(config).await;
                None
            }
            UiRequest::VerifyApiKey {
                api_key,
                api_base_url,
                anon_key,
            } => Some(
                match self.verify_api_key(api_key, api_base_url, anon_key).await {
                    Ok(user) => HostReply::api_key_verified(user),
                    Err(err) => self.fail(err, HostReply::verify_failed),
                },
            ),
            UiRequest::GetProjects => Some(match self.get_projects().await {
                Ok(projects) => HostReply::projects_loaded(projects),
                Err(err) => self.fail(err, HostReply::projects_failed),
            }),
            UiRequest::GetUxDebts { project_id } => Some(match self.get_debts(project_id).await {
                Ok(debts) => HostReply::debts_loaded(project_id, debts),
                Err(err) => self.fail(err, HostReply::debts_failed),
            }),
            UiRequest::CreateUxDebt {
                project_id,
                debt_data,
            } => Some(match self.create_debt(project_id, debt_data).await {
                Ok(debt) => HostReply::debt_created(debt),
                Err(err) => self.fail(err, HostReply::create_failed),
            }),
            UiRequest::UpdateUxDebt {
                debt_id, debt_data, ..
            } => Some(match self.update_debt(debt_id, debt_data).await {
                Ok(debt) => HostReply::debt_updated(debt),
                Err(err) => self.fail(err, HostReply::update_failed),
            }),
            UiRequest::DeleteUxDebt { debt_id, .. } => Some(match self.delete_debt(debt_id).await {
                Ok(()) => HostReply::debt_deleted(),
                Err(err) => self.fail(err, HostReply::delete_failed),
            }),
            UiRequest::GetDesignContext => Some(HostReply::DesignContext {
                context: derive_design_context(&self.env).await,
            }),
            UiRequest::Logout => {
                self.logout().await;
                None
            }
            UiRequest::ClosePlugin => {
                self.env.close();
                None
            }
        }
    }

    /// Envelope-aware dispatch: the correlation id, when present, is
    /// echoed verbatim on the reply. v1 logic does not otherwise use it.
    pub async fn handle_envelope(
        &mut self,
        envelope: Envelope<UiRequest>,
    ) -> Option<Envelope<HostReply>> {
        let request_id = envelope.request_id;
        self.handle(envelope.body).await.map(|body| Envelope {
            request_id,
            body,
        })
    }

    // ── Request handlers ─────────────────────────────────────────

    async fn load_config(&self) -> HostReply {
        let config = self
            .env
            .storage_get(KEY_CONFIG)
            .await
            .and_then(|raw| serde_json::from_str(&raw).ok());
        HostReply::ConfigLoaded { config }
    }

    async fn save_config(&mut self, config: PluginConfig) {
        match serde_json::to_string(&config) {
            Ok(raw) => self.env.storage_set(KEY_CONFIG, &raw).await,
            Err(err) => warn!(%err, "could not serialize config"),
        }
        self.session.config = Some(config);
    }

    async fn verify_api_key(
        &mut self,
        api_key: String,
        api_base_url: Option<String>,
        anon_key: Option<String>,
    ) -> PluginResult<UserProfile> {
        if let (Some(api_base_url), Some(anon_key)) = (api_base_url, anon_key) {
            self.session.config = Some(PluginConfig {
                api_base_url,
                anon_key,
            });
        }
        let config = self
            .session
            .config
            .clone()
            .ok_or(PluginError::ConfigMissing)?;
        let user = self.rest.verify_key(&config, &api_key).await?;
        self.env.storage_set(KEY_API_KEY, &api_key).await;
        self.session.api_key = Some(api_key);
        self.session.verified_user = Some(user.clone());
        self.session.last_error = None;
        info!(user = %user.id, "api key verified");
        Ok(user)
    }

    async fn get_projects(&self) -> PluginResult<Vec<ProjectRecord>> {
        let (config, key, user) = self.verified()?;
        self.rest.projects(&config, &key, user.id).await
    }

    async fn get_debts(&self, project: ProjectId) -> PluginResult<Vec<Issue>> {
        let (config, key) = self.authenticated()?;
        self.rest.debts(&config, &key, project).await
    }

    async fn create_debt(
        &self,
        project: ProjectId,
        mut draft: IssueDraft,
    ) -> PluginResult<Issue> {
        let (config, key, user) = self.verified()?;
        let context = derive_design_context(&self.env).await;
        draft.logged_by = user.display_name;
        draft.link_url = Some(context.url);
        if draft.screen.trim().is_empty() {
            draft.screen = context.page_name;
        }
        draft.status = IssueStatus::Open;
        self.rest.create_debt(&config, &key, project, &draft).await
    }

    async fn update_debt(&self, debt: IssueId, patch: IssuePatch) -> PluginResult<Issue> {
        let (config, key, _) = self.verified()?;
        self.rest.update_debt(&config, &key, debt, &patch).await
    }

    async fn delete_debt(&self, debt: IssueId) -> PluginResult<()> {
        let (config, key) = self.authenticated()?;
        self.rest.delete_debt(&config, &key, debt).await
    }

    async fn logout(&mut self) {
        self.env.storage_delete(KEY_API_KEY).await;
        self.env.storage_delete(KEY_CONFIG).await;
        self.session.reset();
        info!("logged out");
    }

    // ── Preconditions ────────────────────────────────────────────

    /// Key present but not yet verified is enough for reads that only
    /// need the credential headers.
    fn authenticated(&self) -> PluginResult<(PluginConfig, String)> {
        let key = self
            .session
            .api_key
            .clone()
            .ok_or(PluginError::NotAuthenticated)?;
        let config = self
            .session
            .config
            .clone()
            .ok_or(PluginError::ConfigMissing)?;
        Ok((config, key))
    }

    /// Calls that also need the verified user's identity.
    fn verified(&self) -> PluginResult<(PluginConfig, String, UserProfile)> {
        let (config, key) = self.authenticated()?;
        let user = self
            .session
            .verified_user
            .clone()
            .ok_or(PluginError::NotAuthenticated)?;
        Ok((config, key, user))
    }

    fn fail<F>(&mut self, err: PluginError, shape: F) -> HostReply
    where
        F: FnOnce(String) -> HostReply,
    {
        let text = err.to_string();
        warn!(error = %text, "request failed");
        self.session.last_error = Some(text.clone());
        shape(text)
    }
}
