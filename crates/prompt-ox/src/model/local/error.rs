use thiserror::Error;

use crate::errors::LlmError;

/// Failures raised by a [`super::LocalBackend`] or its tokenizer.
#[derive(Debug, Error)]
pub enum LocalError {
    #[error("model download failed: {0}")]
    Download(String),

    #[error("model load failed: {0}")]
    Load(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LocalError> for LlmError {
    fn from(error: LocalError) -> Self {
        LlmError::local_backend(error.to_string())
    }
}
