//! API error type
//!
//! Every failed request maps to an `ApiError`. When the server answered, the
//! `message`/`error` fields of its body are kept so they can be shown to the
//! user verbatim.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("Request failed with status {status}")]
    Status {
        status: u16,
        message: Option<String>,
        error: Option<String>,
    },

    /// No response: connection refused, timeout, TLS failure...
    #[error("Network error: {0}")]
    Network(String),

    /// The response body was not what the hook expected
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Build a status error from a response body
    pub fn from_body(status: u16, body: &Value) -> Self {
        Self::Status {
            status,
            message: body.get("message").and_then(text_of),
            error: body.get("error").and_then(text_of),
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided explanation: `message` first, then `error`
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, error, .. } => {
                message.as_deref().or(error.as_deref())
            }
            _ => None,
        }
    }

    /// Text to show the user, falling back to `fallback` when the server
    /// gave no explanation
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.server_message().unwrap_or(fallback)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_builder() {
            ApiError::InvalidRequest(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Server messages come as a string or, for validation failures, a list of
/// strings. Blank strings carry no message.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}
