use thiserror::Error;

use crate::errors::LlmError;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The provider returned no text for a schema-constrained call.
    #[error("no output returned for {type_name}")]
    EmptyOutput { type_name: String },

    #[error("failed to decode {type_name} from `{raw_text}`: {source}")]
    Decode {
        type_name: String,
        raw_text: String,
        #[source]
        source: serde_json::Error,
    },
}
