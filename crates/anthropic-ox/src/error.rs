use prompt_ox_common::CommonRequestError;
use thiserror::Error;

/// Categorizes errors for handling by callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rate limiting
    RateLimit,
    /// Authentication/authorization issues
    Auth,
    /// Invalid request format
    InvalidRequest,
    /// Server overloaded
    ServerOverloaded,
    /// Network/connection issues, including timeouts
    Network,
    /// Unknown/other errors
    Other,
}

#[derive(Debug, Error)]
pub enum AnthropicRequestError {
    /// Transport failure before a reply was received
    #[error(transparent)]
    Transport(CommonRequestError),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    /// Invalid request errors from the API
    #[error("Invalid request error: {0}")]
    InvalidRequest(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// API overloaded
    #[error("API overloaded: {0}")]
    Overloaded(String),

    /// Any other non-success reply
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

impl AnthropicRequestError {
    /// Returns the error kind for categorizing errors
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimit(_) => ErrorKind::RateLimit,
            Self::Authentication(_) | Self::PermissionDenied(_) => ErrorKind::Auth,
            Self::InvalidRequest(_) | Self::NotFound(_) => ErrorKind::InvalidRequest,
            Self::Overloaded(_) => ErrorKind::ServerOverloaded,
            Self::Transport(CommonRequestError::Http(_) | CommonRequestError::Timeout(_)) => {
                ErrorKind::Network
            }
            Self::Transport(_) | Self::SerdeError(_) | Self::Api { .. } => ErrorKind::Other,
        }
    }
}

impl From<CommonRequestError> for AnthropicRequestError {
    fn from(error: CommonRequestError) -> Self {
        match error {
            CommonRequestError::Status {
                status,
                kind,
                message,
            } => match (kind.as_deref(), status) {
                (Some("invalid_request_error"), _) => Self::InvalidRequest(message),
                (Some("authentication_error"), _) | (None, 401) => Self::Authentication(message),
                (Some("permission_error"), _) | (None, 403) => Self::PermissionDenied(message),
                (Some("not_found_error"), _) | (None, 404) => Self::NotFound(message),
                (Some("rate_limit_error"), _) | (None, 429) => Self::RateLimit(message),
                (Some("overloaded_error"), _) | (None, 529) => Self::Overloaded(message),
                _ => Self::Api { status, message },
            },
            CommonRequestError::Json(e) => Self::SerdeError(e),
            other => Self::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_follow_the_error_type() {
        let err: AnthropicRequestError = CommonRequestError::Status {
            status: 400,
            kind: Some("overloaded_error".to_string()),
            message: "busy".to_string(),
        }
        .into();
        assert!(matches!(err, AnthropicRequestError::Overloaded(ref m) if m == "busy"));
        assert_eq!(err.kind(), ErrorKind::ServerOverloaded);
    }

    #[test]
    fn untyped_errors_fall_back_to_status() {
        let err: AnthropicRequestError = CommonRequestError::Status {
            status: 429,
            kind: None,
            message: "Too Many Requests".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::RateLimit);

        let err: AnthropicRequestError = CommonRequestError::Status {
            status: 500,
            kind: Some("api_error".to_string()),
            message: "boom".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "API error (HTTP 500): boom");
    }
}
