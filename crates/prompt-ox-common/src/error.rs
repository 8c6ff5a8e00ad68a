use std::time::Duration;

use thiserror::Error;

/// Common errors that can occur while talking to a provider over HTTP
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// HTTP request failed before a status was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status {
        /// Numeric HTTP status code
        status: u16,
        /// Provider error type, e.g. `rate_limit_error`, when the body names one
        kind: Option<String>,
        /// Message extracted from the error body, or the raw body
        message: String,
    },

    /// The request did not complete within the sender's timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Authentication is missing (no API key provided)
    #[error("Authentication missing: no API key provided")]
    AuthenticationMissing,

    /// A header name or value could not be encoded
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl CommonRequestError {
    /// HTTP status of the failed reply, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Parse error response from HTTP status and body
#[must_use]
pub fn parse_error_response(status: u16, body: &[u8]) -> CommonRequestError {
    let json = serde_json::from_slice::<serde_json::Value>(body).ok();
    let message = json
        .as_ref()
        .and_then(extract_error_message)
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());
    let kind = json.as_ref().and_then(extract_error_kind);

    CommonRequestError::Status {
        status,
        kind,
        message,
    }
}

/// Extract the provider's error type: `{"error": {"type": ...}}`.
fn extract_error_kind(json: &serde_json::Value) -> Option<String> {
    json.get("error")?
        .get("type")?
        .as_str()
        .map(ToOwned::to_owned)
}

/// Extract error message from the provider JSON error formats.
///
/// OpenAI, Anthropic and xAI all nest it as `{"error": {"message": ...}}`;
/// some gateways answer with a bare `{"message": ...}`.
fn extract_error_message(json: &serde_json::Value) -> Option<String> {
    json.get("error")
        .and_then(|error| match error {
            serde_json::Value::String(s) => Some(s.as_str()),
            other => other.get("message").and_then(serde_json::Value::as_str),
        })
        .or_else(|| json.get("message").and_then(serde_json::Value::as_str))
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_error_message_is_extracted() {
        let body = br#"{"error":{"type":"invalid_request_error","message":"max_tokens too large"}}"#;
        let err = parse_error_response(400, body);
        match err {
            CommonRequestError::Status {
                status,
                kind,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(kind.as_deref(), Some("invalid_request_error"));
                assert_eq!(message, "max_tokens too large");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bare_message_and_raw_body_fallbacks() {
        let err = parse_error_response(503, br#"{"message":"overloaded"}"#);
        assert_eq!(err.to_string(), "HTTP 503: overloaded");

        let err = parse_error_response(502, b"Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
        assert_eq!(err.status(), Some(502));
    }
}
