use thiserror::Error;

use crate::errors::LlmError;

#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("Missing OPENAI_API_KEY")]
    MissingApiKey,

    #[error("API error: {0}")]
    Api(#[from] openai_ox::OpenAIRequestError),

    #[error("Response has no choices")]
    NoChoices,
}

impl From<OpenAiError> for LlmError {
    fn from(error: OpenAiError) -> Self {
        match error {
            OpenAiError::MissingApiKey => LlmError::MissingApiKey("OPENAI_API_KEY"),
            OpenAiError::Api(e) => LlmError::api(format!("openai: {e}")),
            OpenAiError::NoChoices => LlmError::unexpected_output("openai: response has no choices"),
        }
    }
}
