mod conversion;
mod error;

pub use conversion::{JSON_TOOL_NAME, thinking_budget};
pub use error::AnthropicError;

use std::{fmt, sync::Arc};

use anthropic_ox::{Anthropic, ChatRequest};
use bon::Builder;
use futures_util::{FutureExt, future::BoxFuture};
use prompt_ox_common::{RequestSender, default_sender};

use crate::{
    errors::LlmError,
    format::{ApiType, ResponseFormat},
    message::Message,
    model::{Llm, ThinkingLevel, ToolArgumentPolicy, segments::{check_tool_definitions, system_prompt}},
    output::LlmOutput,
    tool::ToolDefinition,
};

/// Default maximum tokens for Anthropic models
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Adapter for the Anthropic Messages protocol.
///
/// The system prompt is the prefix followed by the first system message.
/// Tool exchanges, thinking turns and thinking budgets are only sent in
/// [`ApiType::Advanced`].
#[derive(Clone, Builder)]
pub struct AnthropicModel {
    #[builder(into)]
    api_key: String,
    /// The specific model name (e.g., "claude-sonnet-4-0").
    #[builder(into)]
    model: String,
    #[builder(default = anthropic_ox::BASE_URL.to_string(), into)]
    base_url: String,
    temperature: Option<f32>,
    #[builder(default = DEFAULT_MAX_OUTPUT_TOKENS)]
    max_output_tokens: u32,
    thinking_level: Option<ThinkingLevel>,
    #[builder(default)]
    tools: Vec<ToolDefinition>,
    #[builder(into)]
    system_prompt_prefix: Option<String>,
    #[builder(default)]
    tool_argument_policy: ToolArgumentPolicy,
    #[builder(default)]
    strict_output_decoding: bool,
    /// Also send the key as a bearer token, for hosts other than Anthropic.
    #[builder(default)]
    bearer_auth: bool,
    #[builder(default = default_sender())]
    sender: Arc<dyn RequestSender>,
}

impl AnthropicModel {
    /// Reads the key from `ANTHROPIC_API_KEY`.
    ///
    /// # Errors
    ///
    /// Fails with [`LlmError::MissingApiKey`] when the variable is not set.
    pub fn from_env(model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| AnthropicError::MissingApiKey("ANTHROPIC_API_KEY"))?;
        Ok(Self::builder().api_key(api_key).model(model).build())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn client(&self) -> Anthropic {
        Anthropic::builder()
            .api_key(self.api_key.clone())
            .base_url(self.base_url.clone())
            .bearer_auth(self.bearer_auth)
            .sender(Arc::clone(&self.sender))
            .build()
    }

    fn request(
        &self,
        messages: &[Message],
        stops: &[String],
        response_format: &ResponseFormat,
        api_type: ApiType,
    ) -> Result<ChatRequest, LlmError> {
        if api_type == ApiType::Advanced {
            check_tool_definitions(&self.tools)?;
        }
        let system = system_prompt(self.system_prompt_prefix.as_deref(), messages)?;
        let turns = conversion::messages(messages, api_type, self.tool_argument_policy)?;
        let budget = match (api_type, self.thinking_level) {
            (ApiType::Advanced, Some(level)) => Some(thinking_budget(level)),
            _ => None,
        };
        let (tools, tool_choice) =
            conversion::tools(&self.tools, api_type, response_format, budget.is_some());

        // Extended thinking requires the default temperature.
        let temperature = match (budget, self.temperature) {
            (Some(_), Some(_)) => {
                log::debug!("ignoring temperature while thinking is enabled");
                None
            }
            (_, temperature) => temperature,
        };

        let request = ChatRequest::builder()
            .model(self.model.clone())
            .messages(turns)
            .maybe_system(system)
            .max_tokens(self.max_output_tokens)
            .maybe_stop_sequences((!stops.is_empty()).then(|| stops.to_vec()))
            .maybe_temperature(temperature)
            .maybe_tools(tools)
            .maybe_tool_choice(tool_choice)
            .build();

        Ok(match budget {
            Some(budget) => request.with_thinking(budget),
            None => request,
        })
    }
}

impl Llm for AnthropicModel {
    fn model(&self) -> &str {
        &self.model
    }

    fn infer<'a>(
        &'a self,
        messages: &'a [Message],
        stops: &'a [String],
        response_format: &'a ResponseFormat,
        api_type: ApiType,
    ) -> BoxFuture<'a, Result<Option<LlmOutput>, LlmError>> {
        async move {
            let request = self.request(messages, stops, response_format, api_type)?;
            log::debug!("messages request for {} at {}", self.model, self.base_url);
            let response = self
                .client()
                .send(&request)
                .await
                .map_err(AnthropicError::from)?;
            conversion::output(response, response_format, self.strict_output_decoding)
        }
        .boxed()
    }
}

impl fmt::Debug for AnthropicModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicModel")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("thinking_level", &self.thinking_level)
            .finish_non_exhaustive()
    }
}
