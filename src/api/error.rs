//! Resource client error taxonomy and backend error-body parsing.

use serde_json::Value;

use crate::validation::{FieldErrors, NON_FIELD};

/// Failure of one request. Never fatal: scoped to the triggering interaction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// 401 on an authenticated endpoint. The session has already been
    /// cleared and the user sent to `/login`.
    #[error("Authentication required")]
    Unauthorized,
    /// 401 on `/auth/login/`.
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Any other 4xx, with whatever field messages the body carried.
    #[error("Request rejected ({status}): {fields}")]
    Rejected { status: u16, fields: FieldErrors },
    #[error("Resource not found")]
    NotFound,
    #[error("Backend unreachable: {0}")]
    Network(String),
    #[error("Unexpected response body: {0}")]
    Decode(String),
    #[error("Backend error ({status}): {body}")]
    Server { status: u16, body: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized | ApiError::InvalidCredentials => Some(401),
            ApiError::Rejected { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::NotFound => Some(404),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Map a non-success status (other than 401) and its raw body.
pub(crate) fn from_status(status: u16, body: &str) -> ApiError {
    match status {
        404 => ApiError::NotFound,
        400..=499 => ApiError::Rejected {
            status,
            fields: parse_field_errors(body),
        },
        _ => ApiError::Server {
            status,
            body: body.chars().take(500).collect(),
        },
    }
}

/// Accepts `{field: [msg..]}`, `{field: msg}`, `{message|detail: msg}`,
/// a bare list of messages, or a bare string. Anything else yields no fields.
pub fn parse_field_errors(body: &str) -> FieldErrors {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return FieldErrors::new();
    };
    let mut errors = FieldErrors::new();
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                let field = match key.as_str() {
                    "message" | "detail" | "error" => NON_FIELD,
                    other => other,
                };
                if let Some(message) = message_of(&v) {
                    errors.insert(field, message);
                }
            }
        }
        Value::Array(_) | Value::String(_) => {
            if let Some(message) = message_of(&value) {
                errors.insert(NON_FIELD, message);
            }
        }
        _ => {}
    }
    errors
}

fn message_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(message_of).collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        Value::Object(map) => {
            let parts: Vec<String> = map.values().filter_map(message_of).collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
