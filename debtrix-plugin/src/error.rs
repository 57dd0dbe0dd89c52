//! Error taxonomy for the plugin host.
//!
//! Everything crossing the bridge is flattened to `{success: false,
//! error: <Display>}` — the taxonomy survives only in the message text,
//! which is a known limitation of the protocol, so the `Display` forms
//! here are exactly what the UI shows.

use thiserror::Error;

/// Result type for plugin host operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Failures the host can surface to the plugin UI.
#[derive(Debug, Error)]
pub enum PluginError {
    /// No API base URL / anon key resolvable from the message or the
    /// cached configuration. Checked before any HTTP is attempted.
    #[error("Configuration not found")]
    ConfigMissing,

    /// The key reached the backend but matched no profile.
    #[error("Invalid API key - no user found")]
    AuthInvalid,

    /// A call that needs a verified key was made before verification.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Non-2xx response; the body text is surfaced verbatim.
    #[error("HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// Transport-level failure (DNS, TLS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Malformed payload in either direction.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything uncaught, with the best message available.
    #[error("{0}")]
    Unknown(String),
}

impl From<reqwest::Error> for PluginError {
    fn from(err: reqwest::Error) -> Self {
        PluginError::Network(err.to_string())
    }
}
