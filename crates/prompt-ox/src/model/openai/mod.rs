mod conversion;
mod error;

pub use error::OpenAiError;

use std::{fmt, sync::Arc};

use bon::Builder;
use futures_util::{FutureExt, future::BoxFuture};
use openai_ox::{ChatRequest, OpenAI, client::BASE_URL, responses::ResponsesRequest};
use prompt_ox_common::{RequestSender, default_sender};

use crate::{
    errors::LlmError,
    format::{ApiType, ResponseFormat},
    message::Message,
    model::{Llm, ThinkingLevel, ToolArgumentPolicy, segments::check_tool_definitions},
    output::LlmOutput,
    tool::ToolDefinition,
};

/// Default cap on generated tokens.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 10_000;

/// OpenAI adapter.
///
/// [`ApiType::Standard`] talks to Chat Completions and carries text and
/// images only. [`ApiType::Advanced`] talks to the Responses API, which also
/// carries tool exchanges, reasoning items and structured output.
#[derive(Clone, Builder)]
pub struct OpenAiModel {
    #[builder(into)]
    api_key: String,
    /// Model identifier, e.g. `gpt-4o` or `o4-mini`.
    #[builder(into)]
    model: String,
    #[builder(default = BASE_URL.to_string(), into)]
    base_url: String,
    temperature: Option<f32>,
    #[builder(default = DEFAULT_MAX_OUTPUT_TOKENS)]
    max_output_tokens: u32,
    /// Reasoning effort for advanced calls. Unset leaves the choice to the
    /// server, which uses medium for reasoning models and accepts non-reasoning
    /// models.
    thinking_level: Option<ThinkingLevel>,
    #[builder(default)]
    tools: Vec<ToolDefinition>,
    #[builder(into)]
    system_prompt_prefix: Option<String>,
    /// Only honoured in advanced mode.
    #[builder(default = true)]
    store_responses: bool,
    #[builder(default)]
    tool_argument_policy: ToolArgumentPolicy,
    #[builder(default)]
    strict_output_decoding: bool,
    #[builder(default = default_sender())]
    sender: Arc<dyn RequestSender>,
}

impl OpenAiModel {
    /// Reads the key from `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Fails with [`LlmError::MissingApiKey`] when the variable is not set.
    pub fn from_env(model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| OpenAiError::MissingApiKey)?;
        Ok(Self::builder().api_key(api_key).model(model).build())
    }

    fn client(&self) -> OpenAI {
        OpenAI::builder()
            .api_key(self.api_key.clone())
            .base_url(self.base_url.clone())
            .sender(Arc::clone(&self.sender))
            .build()
    }

    async fn infer_standard(
        &self,
        messages: &[Message],
        stops: &[String],
        response_format: &ResponseFormat,
    ) -> Result<Option<LlmOutput>, LlmError> {
        if self.store_responses {
            log::debug!("store_responses only applies to advanced mode; ignoring");
        }
        let request = ChatRequest::builder()
            .model(self.model.clone())
            .messages(conversion::chat_messages(
                self.system_prompt_prefix.as_deref(),
                messages,
            )?)
            .maybe_temperature(self.temperature)
            .max_completion_tokens(self.max_output_tokens)
            .maybe_stop((!stops.is_empty()).then(|| stops.to_vec()))
            .maybe_response_format(conversion::chat_response_format(response_format))
            .build();

        log::debug!("openai chat completion for {}", self.model);
        let response = self
            .client()
            .send(&request)
            .await
            .map_err(OpenAiError::from)?;
        conversion::chat_output(response, self.strict_output_decoding)
    }

    async fn infer_advanced(
        &self,
        messages: &[Message],
        stops: &[String],
        response_format: &ResponseFormat,
    ) -> Result<Option<LlmOutput>, LlmError> {
        if !stops.is_empty() {
            log::debug!("the Responses API has no stop sequences; ignoring {stops:?}");
        }
        check_tool_definitions(&self.tools)?;
        let request = ResponsesRequest::builder()
            .model(self.model.clone())
            .input(conversion::responses_input(
                messages,
                self.tool_argument_policy,
            )?)
            .maybe_instructions(self.system_prompt_prefix.clone())
            .maybe_reasoning(self.thinking_level.map(conversion::reasoning_config))
            .maybe_text(conversion::text_config(response_format))
            .maybe_tools(conversion::responses_tools(&self.tools))
            .store(self.store_responses)
            .maybe_temperature(self.temperature)
            .max_output_tokens(self.max_output_tokens)
            .build();

        log::debug!("openai response for {}", self.model);
        let response = self
            .client()
            .send_responses(&request)
            .await
            .map_err(OpenAiError::from)?;
        conversion::responses_output(&response, self.strict_output_decoding)
    }
}

impl Llm for OpenAiModel {
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
            match api_type {
                ApiType::Standard => {
                    self.infer_standard(messages, stops, response_format)
                        .await
                }
                ApiType::Advanced => {
                    self.infer_advanced(messages, stops, response_format)
                        .await
                }
            }
        }
        .boxed()
    }
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("thinking_level", &self.thinking_level)
            .field("tools", &self.tools.len())
            .finish_non_exhaustive()
    }
}
