//! Per-process plugin session state.

use debtrix_types::UserProfile;
use serde::{Deserialize, Serialize};

/// Backend endpoint configuration the plugin UI collects once and the
/// host caches in key/value storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Base URL of the hosted backend, e.g. `https://xyz.supabase.co`.
    pub api_base_url: String,
    /// The backend's anonymous (public) API key.
    pub anon_key: String,
}

/// State the host carries for the lifetime of a design-document session.
///
/// One instance per host process, passed into the dispatcher — never
/// module-global. `api_key` and `config` are mirrored to host storage;
/// `verified_user` is re-derived by re-verifying the stored key on load
/// and is never persisted.
#[derive(Debug, Clone, Default)]
pub struct PluginSession {
    pub api_key: Option<String>,
    pub config: Option<PluginConfig>,
    pub verified_user: Option<UserProfile>,
    pub last_error: Option<String>,
}

impl PluginSession {
    /// True once a key has been verified against a profile.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.api_key.is_some() && self.verified_user.is_some()
    }

    /// Clears everything, as on logout.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
