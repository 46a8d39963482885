// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client-side error taxonomy.
//!
//! Every flow in the crate returns [`ApiError`]. Validation errors are produced
//! locally and never reach the network; everything else comes from a call to
//! the backend. [`describe`] turns any error into the inline message a form
//! shows next to the failed action.

use serde_json::Value;

/// Message shown when the backend gives no usable explanation.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Placeholder rendered for missing optional values.
pub const PLACEHOLDER: &str = "—";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Local form validation failed; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// An authenticated call was attempted without a session token.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The backend rejected the session token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Non-success HTTP status or an envelope with `success = false`.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport failure (connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The body did not match the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse(message.into())
    }

    /// Build an error from a non-success HTTP response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = parse_error_body(body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
        if status == 401 {
            Self::Unauthorized(message)
        } else {
            Self::Api { status, message }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// HTTP status, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::UnexpectedResponse(error.to_string())
        } else if let Some(status) = error.status() {
            Self::Api {
                status: status.as_u16(),
                message: GENERIC_ERROR_MESSAGE.to_string(),
            }
        } else {
            Self::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::UnexpectedResponse(error.to_string())
    }
}

/// Human-readable message for an error, suitable for inline display.
pub fn describe(error: &ApiError) -> String {
    match error {
        ApiError::Validation(message) => message.clone(),
        ApiError::NotAuthenticated => "Please sign in to continue.".to_string(),
        ApiError::Unauthorized(_) => "Your session has expired. Please sign in again.".to_string(),
        ApiError::Api { message, .. } => message.clone(),
        ApiError::Network(_) => {
            "Network error. Check your connection and try again.".to_string()
        }
        ApiError::UnexpectedResponse(_) => "Unexpected response from server.".to_string(),
    }
}

/// Extract a message from an error body.
///
/// Looks at `message`, `error` and `detail` string fields, then at the first
/// entry of `errors` (object of field errors or array). Plain-text bodies are
/// returned as-is when short enough to show.
pub fn parse_error_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return (trimmed.len() <= 200 && !trimmed.starts_with('<')).then(|| trimmed.to_string());
    };

    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(first_text))
        .or_else(|| value.get("errors").and_then(first_text))
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Array(items) => items.iter().find_map(first_text),
        Value::Object(map) => map.values().find_map(first_text),
        _ => None,
    }
}

/// Render an optional value, falling back to [`PLACEHOLDER`].
pub fn or_placeholder(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => PLACEHOLDER,
    }
}
