//! API Error Types
//!
//! Every failed backend call is reduced to one [`ApiError`] whose `Display`
//! text is the message shown to the user.

use serde_json::Value;
use thiserror::Error;

/// Fallback when an error body is not JSON at all
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Errors returned by the PriceTrack backend client
#[derive(Error, Debug)]
pub enum ApiError {
    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Connection failed or the request could not be sent
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Success body did not match the expected shape
    #[error("Parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Authenticated call attempted without a session token
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Input rejected before any request was made
    #[error("{0}")]
    Invalid(String),
}

impl ApiError {
    /// Build a status error from a raw response body
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        ApiError::Status {
            status,
            message: error_message(status, body),
        }
    }

    /// Map a transport failure, separating timeouts
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }

    /// Human-readable message, surfaced verbatim by the state containers
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status, if the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected our credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::NotAuthenticated)
            || matches!(self.status(), Some(401) | Some(403))
    }
}

/// Result type for backend operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Extract the display message from an error response body.
///
/// Prefers FastAPI's `detail` (string or list of validation errors), then an
/// `error` string or `error.message`. A JSON body without either yields
/// `HTTP error! status: <code>`; anything unparsable yields [`UNKNOWN_ERROR`].
pub fn error_message(status: u16, body: &[u8]) -> String {
    let parsed: Value = match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(_) => return UNKNOWN_ERROR.to_string(),
    };

    parsed
        .get("detail")
        .and_then(detail_text)
        .or_else(|| parsed.get("error").and_then(error_text))
        .unwrap_or_else(|| format!("HTTP error! status: {}", status))
}

fn detail_text(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

fn error_text(error: &Value) -> Option<String> {
    match error {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        let body = br#"{"detail": "Incorrect username or password"}"#;
        assert_eq!(error_message(401, body), "Incorrect username or password");
    }

    #[test]
    fn test_detail_validation_list() {
        let body = br#"{"detail": [
            {"loc": ["body", "urls", 0], "msg": "invalid or missing URL scheme", "type": "url_parsing"},
            {"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error"}
        ]}"#;
        assert_eq!(
            error_message(422, body),
            "invalid or missing URL scheme; value is not a valid email address"
        );
    }

    #[test]
    fn test_error_field() {
        assert_eq!(error_message(500, br#"{"error": "boom"}"#), "boom");
        assert_eq!(
            error_message(500, br#"{"error": {"code": "X", "message": "nested boom"}}"#),
            "nested boom"
        );
    }

    #[test]
    fn test_json_without_message_uses_status() {
        assert_eq!(error_message(404, br#"{"foo": 1}"#), "HTTP error! status: 404");
        assert_eq!(error_message(400, br#"{"detail": ""}"#), "HTTP error! status: 400");
        assert_eq!(error_message(404, br#""Not Found""#), "HTTP error! status: 404");
        assert_eq!(error_message(500, b"null"), "HTTP error! status: 500");
        assert_eq!(error_message(500, b"42"), "HTTP error! status: 500");
        assert_eq!(error_message(500, b"[]"), "HTTP error! status: 500");
    }

    #[test]
    fn test_non_json_body() {
        assert_eq!(error_message(502, b"<html>Bad Gateway</html>"), UNKNOWN_ERROR);
        assert_eq!(error_message(500, b""), UNKNOWN_ERROR);
    }

    #[test]
    fn test_unauthorized_classification() {
        assert!(ApiError::from_response(401, b"{}").is_unauthorized());
        assert!(ApiError::from_response(403, b"{}").is_unauthorized());
        assert!(ApiError::NotAuthenticated.is_unauthorized());
        assert!(!ApiError::from_response(404, b"{}").is_unauthorized());
    }

    #[test]
    fn test_message_is_verbatim() {
        let err = ApiError::from_response(400, br#"{"detail": "Email already registered"}"#);
        assert_eq!(err.message(), "Email already registered");
        assert_eq!(err.status(), Some(400));
    }
}
