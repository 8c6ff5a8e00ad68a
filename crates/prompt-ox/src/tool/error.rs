use thiserror::Error;

/// Broken correlation inside a [`super::ToolCallExchange`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolExchangeError {
    #[error("exchange call id `{expected}` does not match request call id `{found}`")]
    CallIdMustMatchCallIdInRequest { expected: String, found: String },

    #[error("exchange call id `{expected}` does not match response call id `{found}`")]
    CallIdMustMatchCallIdInResponse { expected: String, found: String },

    #[error("exchange `{call_id}` already has a response")]
    ResponseAlreadyAttached { call_id: String },
}
