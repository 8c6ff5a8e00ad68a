use thiserror::Error;

/// Failures an [`crate::Llm`] adapter reports to its caller.
#[derive(Debug, Error)]
pub enum LlmError {
    /// A message carries content the provider cannot represent.
    #[error("unsupported media type: {media}")]
    UnsupportedMediaType { media: String },

    /// Transport or provider-side failure. Never retried here.
    #[error("API error: {0}")]
    Api(String),

    #[error("not a valid tool call: {0}")]
    NotAValidToolCall(String),

    #[error("not a valid reasoning item: {0}")]
    NotAValidReasoningItem(String),

    /// The reply does not have the shape the adapter expects.
    #[error("unexpected output: {0}")]
    UnexpectedOutput(String),

    #[error("cannot encode arguments for tool `{tool_name}`: {reason}")]
    ToolArgumentEncoding { tool_name: String, reason: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("local backend error: {0}")]
    LocalBackend(String),
}

impl LlmError {
    pub fn unsupported_media_type(media: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            media: media.into(),
        }
    }

    pub fn api(description: impl Into<String>) -> Self {
        Self::Api(description.into())
    }

    pub fn unexpected_output(description: impl Into<String>) -> Self {
        Self::UnexpectedOutput(description.into())
    }

    pub fn tool_argument_encoding(tool_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ToolArgumentEncoding {
            tool_name: tool_name.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn local_backend(message: impl Into<String>) -> Self {
        Self::LocalBackend(message.into())
    }
}

impl From<prompt_ox_common::CommonRequestError> for LlmError {
    fn from(error: prompt_ox_common::CommonRequestError) -> Self {
        Self::Api(error.to_string())
    }
}
