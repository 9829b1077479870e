//! Form state controllers for entity create/update flows.
//!
//! Every form follows the same contract: client-side validation runs before
//! submission and blocks it while errors exist; server-side field errors
//! (HTTP 422) are merged back into the same error surface, overriding any
//! stale client error for the same field; successful submission clears
//! sensitive draft fields and names the list view that must be refreshed;
//! failed submission preserves every entered value.

pub mod agent;
pub mod mcp;
pub mod model;
pub mod provider;
pub mod source;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::client::ApiError;

// === Types ===

/// Field-level error surface shared by client and server validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn set(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Merge server-reported field errors. The server's message wins over a
    /// stale client message for the same field.
    pub fn merge_server(&mut self, server: BTreeMap<String, String>) {
        for (field, message) in server {
            self.errors.insert(field, message);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }
}

/// Submission failure. `Invalid` carries the merged field errors; `Api` is
/// everything else (transport, non-validation status). In both cases the
/// form's entered values are preserved for correction and resubmission.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Validation failed")]
    Invalid(FieldErrors),
    #[error("{0}")]
    Api(String),
}

/// List view invalidated by a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    Providers,
    Models,
    McpServers,
    Sources,
    Agents,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct Submitted {
    pub id: Option<String>,
    pub refresh: ListView,
}

// === Validators ===

pub(crate) fn require(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.set(field, format!("{field} is required"));
    }
}

pub(crate) fn limit(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.set(field, format!("{field} must be at most {max} characters"));
    }
}

/// URL-shape check for non-empty values; empty strings are left to
/// `require` when the field is mandatory.
pub(crate) fn check_url(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        return;
    }
    match reqwest::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.set(field, format!("{field} must be a valid http(s) URL")),
    }
}

/// Map a submission error onto the form's error surface.
pub(crate) fn submit_error(err: ApiError, errors: &mut FieldErrors) -> FormError {
    match err {
        ApiError::Validation {
            errors: server_errors,
        } => {
            errors.merge_server(server_errors);
            FormError::Invalid(errors.clone())
        }
        other => FormError::Api(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_overrides_stale_client_error() {
        let mut errors = FieldErrors::default();
        errors.set("name", "name is required");
        errors.merge_server(BTreeMap::from([(
            "name".to_string(),
            "name already taken".to_string(),
        )]));
        assert_eq!(errors.get("name"), Some("name already taken"));
    }

    #[test]
    fn merge_keeps_client_errors_for_other_fields() {
        let mut errors = FieldErrors::default();
        errors.set("url", "url must be a valid http(s) URL");
        errors.merge_server(BTreeMap::from([(
            "name".to_string(),
            "name already taken".to_string(),
        )]));
        assert_eq!(errors.get("url"), Some("url must be a valid http(s) URL"));
        assert_eq!(errors.get("name"), Some("name already taken"));
    }

    #[test]
    fn url_validator_accepts_http_and_rejects_garbage() {
        let mut errors = FieldErrors::default();
        check_url(&mut errors, "url", "https://example.com");
        assert!(errors.is_empty());
        check_url(&mut errors, "url", "ftp://example.com");
        assert!(errors.get("url").is_some());
    }

    #[test]
    fn empty_optional_url_is_not_an_error() {
        let mut errors = FieldErrors::default();
        check_url(&mut errors, "base_url", "");
        assert!(errors.is_empty());
    }

    #[test]
    fn limit_counts_characters() {
        let mut errors = FieldErrors::default();
        limit(&mut errors, "name", "abc", 3);
        assert!(errors.is_empty());
        limit(&mut errors, "name", "abcd", 3);
        assert!(errors.get("name").is_some());
    }
}
