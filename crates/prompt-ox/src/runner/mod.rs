//! Execution strategies on top of an [`Llm`].
//!
//! Every runner builds the message list, times the `infer` call alone and
//! shapes the reply into an [`ExchangeOutput`]. Runners hold configuration
//! only, so one instance can serve any number of concurrent calls.

mod error;

pub use error::RunnerError;

use std::{
    marker::PhantomData,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::{
    errors::LlmError,
    format::{ApiType, ResponseFormat},
    message::Message,
    model::Llm,
    output::{ExchangeOutput, LlmOutput},
    template::PromptTemplate,
    tool::schema_for_type,
    usage::Usage,
};

#[async_trait]
pub trait PromptRunner: Send + Sync {
    type Output: Send;

    async fn run(&self, messages: Vec<Message>, llm: &dyn Llm) -> Result<Self::Output, RunnerError>;

    /// Renders `template` into a single user message and runs it.
    async fn run_template(
        &self,
        template: &PromptTemplate,
        llm: &dyn Llm,
    ) -> Result<Self::Output, RunnerError> {
        self.run(vec![template.to_message()], llm).await
    }
}

async fn timed_infer(
    llm: &dyn Llm,
    messages: &[Message],
    stops: &[String],
    response_format: &ResponseFormat,
    api_type: ApiType,
) -> Result<(Option<LlmOutput>, Duration), LlmError> {
    let start = Instant::now();
    let result = llm.infer(messages, stops, response_format, api_type).await?;
    let run_time = start.elapsed();
    log::debug!("{} answered in {:.2}s", llm.model(), run_time.as_secs_f64());
    Ok((result, run_time))
}

/// Free text in, free text out. Tool calls and reasoning are not surfaced.
#[derive(Debug, Clone, Default)]
pub struct BasicPromptRunner {
    api_type: ApiType,
    stops: Vec<String>,
}

impl BasicPromptRunner {
    pub fn new(api_type: ApiType) -> Self {
        Self {
            api_type,
            stops: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_stops(mut self, stops: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stops = stops.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl PromptRunner for BasicPromptRunner {
    type Output = LlmOutput;

    async fn run(&self, messages: Vec<Message>, llm: &dyn Llm) -> Result<LlmOutput, RunnerError> {
        let (result, run_time) = timed_infer(
            llm,
            &messages,
            &self.stops,
            &ResponseFormat::Text,
            self.api_type,
        )
        .await?;

        let output = match result {
            Some(output) => LlmOutput {
                tool_calls: None,
                reasoning: None,
                ..output
            },
            None => LlmOutput::from_text("", Usage::NONE),
        };
        Ok(output.with_run_time(run_time))
    }
}

/// Asks for JSON matching the schema of `O` and decodes the reply into it.
///
/// An empty reply or one that does not parse as `O` is an error, never a
/// default value.
pub struct JsonSchemaPromptRunner<O> {
    api_type: ApiType,
    _output: PhantomData<fn() -> O>,
}

impl<O> JsonSchemaPromptRunner<O> {
    pub fn new(api_type: ApiType) -> Self {
        Self {
            api_type,
            _output: PhantomData,
        }
    }
}

impl<O> Default for JsonSchemaPromptRunner<O> {
    fn default() -> Self {
        Self::new(ApiType::default())
    }
}

impl<O> Clone for JsonSchemaPromptRunner<O> {
    fn clone(&self) -> Self {
        Self::new(self.api_type)
    }
}

impl<O> std::fmt::Debug for JsonSchemaPromptRunner<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSchemaPromptRunner")
            .field("api_type", &self.api_type)
            .field("output", &std::any::type_name::<O>())
            .finish()
    }
}

#[async_trait]
impl<O> PromptRunner for JsonSchemaPromptRunner<O>
where
    O: DeserializeOwned + JsonSchema + Send + 'static,
{
    type Output = ExchangeOutput<O>;

    async fn run(
        &self,
        messages: Vec<Message>,
        llm: &dyn Llm,
    ) -> Result<ExchangeOutput<O>, RunnerError> {
        let type_name = O::schema_name().into_owned();
        let format = ResponseFormat::json_schema(schema_for_type::<O>(), type_name.clone());

        let (result, run_time) =
            timed_infer(llm, &messages, &[], &format, self.api_type).await?;
        let Some(output) = result.filter(|output| !output.raw_text.trim().is_empty()) else {
            return Err(RunnerError::EmptyOutput { type_name });
        };

        let decoded = match serde_json::from_str::<O>(&output.raw_text) {
            Ok(decoded) => decoded,
            Err(source) => {
                return Err(RunnerError::Decode {
                    type_name,
                    raw_text: output.raw_text,
                    source,
                });
            }
        };
        Ok(output.map_output(|_| decoded).with_run_time(run_time))
    }
}

/// Always speaks [`ApiType::Advanced`] so tool calls and reasoning come
/// back in the envelope.
#[derive(Debug, Clone, Default)]
pub struct ToolCapablePromptRunner {
    stops: Vec<String>,
}

impl ToolCapablePromptRunner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stops(mut self, stops: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stops = stops.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl PromptRunner for ToolCapablePromptRunner {
    type Output = LlmOutput;

    async fn run(&self, messages: Vec<Message>, llm: &dyn Llm) -> Result<LlmOutput, RunnerError> {
        let (result, run_time) = timed_infer(
            llm,
            &messages,
            &self.stops,
            &ResponseFormat::Text,
            ApiType::Advanced,
        )
        .await?;
        let output = result.unwrap_or_else(|| LlmOutput::from_text("", Usage::NONE));
        Ok(output.with_run_time(run_time))
    }
}
