//! xAI serves Grok models over the Anthropic Messages protocol, so this
//! adapter is an [`AnthropicModel`] pointed at `api.x.ai` with bearer auth.

use std::{fmt, sync::Arc};

use futures_util::future::BoxFuture;
use prompt_ox_common::{RequestSender, default_sender};
use strum::{Display, EnumString};

use crate::{
    errors::LlmError,
    format::{ApiType, ResponseFormat},
    message::Message,
    model::{Llm, ThinkingLevel, ToolArgumentPolicy, anthropic::AnthropicModel},
    output::LlmOutput,
    tool::ToolDefinition,
};

pub const BASE_URL: &str = "https://api.x.ai";

/// Known Grok model identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum XaiModelId {
    #[strum(serialize = "grok2")]
    Grok2,
    #[strum(serialize = "grok2-mini")]
    Grok2Mini,
    #[strum(serialize = "grok-beta")]
    GrokBeta,
}

impl From<XaiModelId> for String {
    fn from(value: XaiModelId) -> Self {
        value.to_string()
    }
}

#[derive(Clone)]
pub struct XaiModel {
    inner: AnthropicModel,
}

#[bon::bon]
impl XaiModel {
    #[builder]
    pub fn new(
        #[builder(into)] api_key: String,
        #[builder(into)] model: String,
        #[builder(into)] base_url: Option<String>,
        temperature: Option<f32>,
        max_output_tokens: Option<u32>,
        thinking_level: Option<ThinkingLevel>,
        #[builder(default)] tools: Vec<ToolDefinition>,
        #[builder(into)] system_prompt_prefix: Option<String>,
        #[builder(default)] tool_argument_policy: ToolArgumentPolicy,
        #[builder(default)] strict_output_decoding: bool,
        #[builder(default = default_sender())] sender: Arc<dyn RequestSender>,
    ) -> Self {
        let inner = AnthropicModel::builder()
            .api_key(api_key)
            .model(model)
            .base_url(base_url.unwrap_or_else(|| BASE_URL.to_string()))
            .maybe_temperature(temperature)
            .maybe_max_output_tokens(max_output_tokens)
            .maybe_thinking_level(thinking_level)
            .tools(tools)
            .maybe_system_prompt_prefix(system_prompt_prefix)
            .tool_argument_policy(tool_argument_policy)
            .strict_output_decoding(strict_output_decoding)
            .bearer_auth(true)
            .sender(sender)
            .build();
        Self { inner }
    }

    /// Reads the key from `XAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Fails with [`LlmError::MissingApiKey`] when the variable is not set.
    pub fn from_env(model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key =
            std::env::var("XAI_API_KEY").map_err(|_| LlmError::MissingApiKey("XAI_API_KEY"))?;
        Ok(Self::builder().api_key(api_key).model(model).build())
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }
}

impl Llm for XaiModel {
    fn model(&self) -> &str {
        self.inner.model()
    }

    fn infer<'a>(
        &'a self,
        messages: &'a [Message],
        stops: &'a [String],
        response_format: &'a ResponseFormat,
        api_type: ApiType,
    ) -> BoxFuture<'a, Result<Option<LlmOutput>, LlmError>> {
        self.inner
            .infer(messages, stops, response_format, api_type)
    }
}

impl fmt::Debug for XaiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("XaiModel").field(&self.inner).finish()
    }
}
