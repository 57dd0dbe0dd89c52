//! REST client for the hosted backend.
//!
//! The plugin sandbox cannot use the managed client library, so the
//! host speaks the backend's plain REST surface directly: filters as
//! `?column=eq.value` query parameters, `Prefer: return=representation`
//! on writes to get the mutated row back, and the anon key plus the
//! user's personal key as headers on every call.
//!
//! Requests carry a 30 second timeout. The original client had none (a
//! hung request left the UI pending forever); the timeout surfaces as
//! the network error kind.

use crate::error::{PluginError, PluginResult};
use crate::session::PluginConfig;
use debtrix_types::{Issue, IssueDraft, IssueId, IssuePatch, ProjectId, ProjectRecord, UserId, UserProfile};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const PROJECT_COLUMNS: &str = "id,title,description,color,owner_id,created_at,updated_at";
const PROFILE_COLUMNS: &str = "id,email,full_name,avatar_url,api_key";

/// HTTP client for the backend's REST surface.
pub struct RestClient {
    http: Client,
}

impl RestClient {
    /// Builds the client with its request timeout.
    #[must_use]
    pub fn new() -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");
        Self { http }
    }

    /// Looks up the profile a personal API key belongs to. An empty
    /// result means the key is not valid.
    pub async fn verify_key(
        &self,
        config: &PluginConfig,
        key: &str,
    ) -> PluginResult<UserProfile> {
        let url = format!(
            "{}/rest/v1/profiles?select={PROFILE_COLUMNS}",
            config.api_base_url
        );
        debug!(%url, "verifying api key");
        let resp = self
            .with_headers(self.http.get(&url), config, key)
            .send()
            .await?;
        let profiles: Vec<UserProfile> = ensure_success(resp).await?.json().await?;
        profiles.into_iter().next().ok_or(PluginError::AuthInvalid)
    }

    /// Lists `owner`'s projects, most recently updated first.
    pub async fn projects(
        &self,
        config: &PluginConfig,
        key: &str,
        owner: UserId,
    ) -> PluginResult<Vec<ProjectRecord>> {
        let url = format!(
            "{}/rest/v1/projects?owner_id=eq.{owner}&select={PROJECT_COLUMNS}&order=updated_at.desc",
            config.api_base_url
        );
        let resp = self
            .with_headers(self.http.get(&url), config, key)
            .send()
            .await?;
        Ok(ensure_success(resp).await?.json().await?)
    }

    /// Lists a project's debt records, most recently created first.
    pub async fn debts(
        &self,
        config: &PluginConfig,
        key: &str,
        project: ProjectId,
    ) -> PluginResult<Vec<Issue>> {
        let url = format!(
            "{}/rest/v1/ux_debts?project_id=eq.{project}&select=*&order=created_at.desc",
            config.api_base_url
        );
        let resp = self
            .with_headers(self.http.get(&url), config, key)
            .send()
            .await?;
        Ok(ensure_success(resp).await?.json().await?)
    }

    /// Inserts a debt record and returns the stored row.
    pub async fn create_debt(
        &self,
        config: &PluginConfig,
        key: &str,
        project: ProjectId,
        draft: &IssueDraft,
    ) -> PluginResult<Issue> {
        #[derive(Serialize)]
        struct InsertBody<'a> {
            #[serde(flatten)]
            draft: &'a IssueDraft,
            project_id: ProjectId,
        }

        let url = format!("{}/rest/v1/ux_debts", config.api_base_url);
        let resp = self
            .with_headers(self.http.post(&url), config, key)
            .header("Prefer", "return=representation")
            .json(&InsertBody {
                draft,
                project_id: project,
            })
            .send()
            .await?;
        first_row(ensure_success(resp).await?).await
    }

    /// Applies a partial update by id and returns the stored row.
    pub async fn update_debt(
        &self,
        config: &PluginConfig,
        key: &str,
        debt: IssueId,
        patch: &IssuePatch,
    ) -> PluginResult<Issue> {
        let url = format!("{}/rest/v1/ux_debts?id=eq.{debt}", config.api_base_url);
        let resp = self
            .with_headers(self.http.patch(&url), config, key)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        first_row(ensure_success(resp).await?).await
    }

    /// Deletes a debt record by id.
    pub async fn delete_debt(
        &self,
        config: &PluginConfig,
        key: &str,
        debt: IssueId,
    ) -> PluginResult<()> {
        let url = format!("{}/rest/v1/ux_debts?id=eq.{debt}", config.api_base_url);
        let resp = self
            .with_headers(self.http.delete(&url), config, key)
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    fn with_headers(
        &self,
        req: RequestBuilder,
        config: &PluginConfig,
        key: &str,
    ) -> RequestBuilder {
        req.header("apikey", &config.anon_key)
            .header("x-api-key", key)
            .header(CONTENT_TYPE, "application/json")
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts non-2xx responses into `Server` errors carrying the body
/// text verbatim.
async fn ensure_success(resp: Response) -> PluginResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(PluginError::Server {
        status: status.as_u16(),
        body,
    })
}

/// Writes with `return=representation` come back as a one-row array.
async fn first_row(resp: Response) -> PluginResult<Issue> {
    let rows: Vec<Issue> = resp.json().await?;
    rows.into_iter()
        .next()
        .ok_or_else(|| PluginError::Unknown("empty representation in response".into()))
}
