#[cfg(feature = "anthropic")]
pub mod anthropic;
#[cfg(feature = "local")]
pub mod local;
#[cfg(feature = "openai")]
pub mod openai;
pub mod segments;
#[cfg(feature = "xai")]
pub mod xai;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    errors::LlmError,
    format::{ApiType, ResponseFormat},
    message::Message,
    output::LlmOutput,
};

/// A provider adapter.
///
/// Implementations translate the unified [`Message`] list into one provider's
/// wire format, send it through their transport and map the reply back. They
/// hold no per-call state, so any number of calls may run concurrently.
pub trait Llm: Send + Sync {
    /// The provider's model identifier.
    fn model(&self) -> &str;

    /// Runs one inference call.
    ///
    /// Returns `Ok(None)` only when the provider legitimately answered with
    /// no content at all.
    fn infer<'a>(
        &'a self,
        messages: &'a [Message],
        stops: &'a [String],
        response_format: &'a ResponseFormat,
        api_type: ApiType,
    ) -> BoxFuture<'a, Result<Option<LlmOutput>, LlmError>>;
}

/// How hard a reasoning model should think.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThinkingLevel {
    Low,
    Medium,
    High,
}

/// What to do with a tool request whose arguments the provider cannot carry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolArgumentPolicy {
    /// Leave the whole exchange out of the request and log a warning.
    #[default]
    Skip,
    /// Fail the call with [`LlmError::ToolArgumentEncoding`].
    Fail,
}
