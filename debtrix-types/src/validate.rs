//! Field validation for drafts and credentials.
//!
//! Mirrors the limits the hosted schema enforces so bad input is caught
//! before a round-trip. Failures carry the offending field name and a
//! message fit for inline display.

use crate::issue::IssueDraft;
use crate::project::ProjectDraft;
use thiserror::Error;
use url::Url;

/// A draft field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn require(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("{field} must be at most {max} characters"),
        ));
    }
    Ok(())
}

/// Validates a project draft: title 1..=100, description 1..=500,
/// non-empty color tag.
pub fn validate_project(draft: &ProjectDraft) -> Result<(), ValidationError> {
    require("title", &draft.title, 100)?;
    require("description", &draft.description, 500)?;
    if draft.color.trim().is_empty() {
        return Err(ValidationError::new("color", "please select a color"));
    }
    Ok(())
}

/// Validates an issue draft: title 1..=200, screen 1..=100, description
/// and recommendation 1..=1000, link URL well-formed when present.
pub fn validate_issue(draft: &IssueDraft) -> Result<(), ValidationError> {
    require("title", &draft.title, 200)?;
    require("screen", &draft.screen, 100)?;
    require("description", &draft.description, 1000)?;
    require("recommendation", &draft.recommendation, 1000)?;
    if let Some(link) = &draft.link_url {
        if !link.is_empty() && Url::parse(link).is_err() {
            return Err(ValidationError::new("link_url", "please enter a valid URL"));
        }
    }
    Ok(())
}

/// Validates sign-up credentials: plausible email, password of at least
/// six characters, display name of at least two.
pub fn validate_credentials(
    email: &str,
    password: &str,
    display_name: &str,
) -> Result<(), ValidationError> {
    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| ValidationError::new("email", "please enter a valid email address"))?;
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ValidationError::new(
            "email",
            "please enter a valid email address",
        ));
    }
    if password.chars().count() < 6 {
        return Err(ValidationError::new(
            "password",
            "password must be at least 6 characters",
        ));
    }
    if display_name.trim().chars().count() < 2 {
        return Err(ValidationError::new(
            "name",
            "name must be at least 2 characters",
        ));
    }
    Ok(())
}
