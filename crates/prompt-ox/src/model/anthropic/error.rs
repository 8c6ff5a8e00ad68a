use thiserror::Error;

use crate::errors::LlmError;

#[derive(Debug, Error)]
pub enum AnthropicError {
    #[error("Missing {0}")]
    MissingApiKey(&'static str),

    #[error("API error: {0}")]
    Api(#[from] anthropic_ox::AnthropicRequestError),
}

impl From<AnthropicError> for LlmError {
    fn from(error: AnthropicError) -> Self {
        match error {
            AnthropicError::MissingApiKey(variable) => LlmError::MissingApiKey(variable),
            AnthropicError::Api(e) => LlmError::api(format!("anthropic: {e}")),
        }
    }
}
