//! User profiles.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// Profile row for a signed-up user.
///
/// At most one profile exists per identity. `api_key`, when present, is
/// the personal credential the design-tool plugin authenticates with;
/// it is unique across all profiles and rotated on demand from the
/// settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    #[serde(rename = "full_name")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl UserProfile {
    /// Creates a fresh profile with no avatar and no API key.
    #[must_use]
    pub fn new(id: UserId, email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: display_name.into(),
            avatar_url: None,
            api_key: None,
        }
    }
}
