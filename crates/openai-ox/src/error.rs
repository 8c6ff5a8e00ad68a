use prompt_ox_common::CommonRequestError;
use thiserror::Error;

/// Errors that can occur when making requests to the OpenAI API
#[derive(Debug, Error)]
pub enum OpenAIRequestError {
    /// Transport failure before a reply was received
    #[error(transparent)]
    Transport(CommonRequestError),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    /// Invalid request errors from the API
    #[error("Invalid request error: {message}")]
    InvalidRequestError {
        message: String,
        r#type: Option<String>,
    },

    /// Authentication failed
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Any other non-success reply
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Unexpected response from the API
    #[error("Unexpected response from API: {0}")]
    UnexpectedResponse(String),

    /// Missing API key
    #[error("Missing API key")]
    MissingApiKey,
}

impl From<CommonRequestError> for OpenAIRequestError {
    fn from(error: CommonRequestError) -> Self {
        match error {
            CommonRequestError::Status {
                status,
                kind,
                message,
            } => match status {
                400 | 404 | 422 => Self::InvalidRequestError {
                    message,
                    r#type: kind,
                },
                401 | 403 => Self::Authentication(message),
                429 => Self::RateLimit(message),
                _ => Self::Api { status, message },
            },
            CommonRequestError::Json(e) => Self::SerdeError(e),
            CommonRequestError::AuthenticationMissing => Self::MissingApiKey,
            other => Self::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_variants() {
        let err: OpenAIRequestError = CommonRequestError::Status {
            status: 400,
            kind: Some("invalid_request_error".into()),
            message: "Unsupported parameter: 'temperature'".into(),
        }
        .into();
        assert!(matches!(
            err,
            OpenAIRequestError::InvalidRequestError { ref r#type, .. } if r#type.as_deref() == Some("invalid_request_error")
        ));

        let err: OpenAIRequestError = CommonRequestError::Status {
            status: 429,
            kind: None,
            message: "slow down".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Rate limit exceeded: slow down");
    }
}
