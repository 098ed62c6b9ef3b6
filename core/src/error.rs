//! Error types for the rental API client.
//!
//! # Design
//! `NotFound` keeps its own variant because pages distinguish "no such
//! rental" from other failures in logs. Every other non-2xx response lands in
//! `HttpError` with the raw status and body. The body is kept verbatim so the
//! structured `{"error": {"message": ..}}` payload can be surfaced to the user.

use serde_json::Value;

/// Errors produced while building, executing or parsing rental API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound { body: String },

    /// The server returned an unexpected non-success status.
    #[error("Request failed with status code {status}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The rental was accepted but the response carried no usable id.
    #[error("Rental created but id was not returned.")]
    MissingRentalId,

    /// The host could not complete the round-trip (DNS, connect, timeout).
    #[error("{0}")]
    Transport(String),

    /// The request was aborted before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Message supplied by the server in a structured error body.
    ///
    /// Looks at `error.message` first, then a top-level `message`.
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            ApiError::NotFound { body } | ApiError::HttpError { body, .. } => body,
            _ => return None,
        };
        let value: Value = serde_json::from_str(body).ok()?;
        value
            .pointer("/error/message")
            .and_then(Value::as_str)
            .or_else(|| value.get("message").and_then(Value::as_str))
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    /// Human-readable text for one failed operation.
    ///
    /// Prefers the structured server message, then this error's own text,
    /// then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(message) = self.server_message() {
            return message;
        }
        let generic = self.to_string();
        if generic.trim().is_empty() {
            fallback.to_string()
        } else {
            generic
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}
