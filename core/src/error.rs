//! Error types for the job tracker client.
//!
//! # Design
//! Every failure is classified once, at the HTTP boundary, into an
//! `ApiError` variant. Transport failures and non-2xx responses share the
//! `Http` variant with the normalized `{status, errors}` shape; stores reduce
//! any variant to one display string with [`ApiError::message`].

use thiserror::Error;

use crate::jsonapi::ErrorObject;

/// Title of the synthetic error used when no structured list is available.
pub const UNKNOWN_ERROR_TITLE: &str = "Unknown Error";

/// Errors returned by `ApiClient` build/parse methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request failed in transit (`status` is `None`) or the server
    /// answered with a non-2xx status.
    #[error("HTTP request failed{}", status_suffix(.status))]
    Http {
        status: Option<u16>,
        errors: Vec<ErrorObject>,
    },

    /// Rejected locally before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Normalized error for a request that never produced a response.
    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Http {
            status: None,
            errors: vec![ErrorObject::new(UNKNOWN_ERROR_TITLE, message)],
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => *status,
            _ => None,
        }
    }

    /// Reduce the error to one human-readable line.
    ///
    /// Preference order: first error `detail`, its `title`, a generic
    /// phrase naming the HTTP status, then the error's own display text.
    pub fn message(&self) -> String {
        if let ApiError::Http { status, errors } = self {
            if let Some(first) = errors.first() {
                if let Some(detail) = first.detail.as_deref().filter(|d| !d.is_empty()) {
                    return detail.to_string();
                }
                if let Some(title) = first.title.as_deref().filter(|t| !t.is_empty()) {
                    return title.to_string();
                }
            }
            if let Some(status) = status.filter(|s| *s != 0) {
                return format!("Request failed (HTTP {status}).");
            }
        }
        self.to_string()
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}
