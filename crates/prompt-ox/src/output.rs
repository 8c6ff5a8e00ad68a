use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{message::ReasoningItem, tool::ToolCallRequest, usage::Usage};

/// Result envelope of one inference call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeOutput<O> {
    /// The provider's text, joined across text segments.
    pub raw_text: String,
    /// `raw_text` decoded into the caller's output type.
    pub output: O,
    pub usage: Usage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningItem>,
    /// Wall-clock time spent waiting on the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_time: Option<Duration>,
}

/// What an adapter returns: the output is the raw text itself.
pub type LlmOutput = ExchangeOutput<String>;

impl<O> ExchangeOutput<O> {
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }

    /// Replace the output, keeping everything else.
    pub fn map_output<P>(self, f: impl FnOnce(O) -> P) -> ExchangeOutput<P> {
        ExchangeOutput {
            raw_text: self.raw_text,
            output: f(self.output),
            usage: self.usage,
            tool_calls: self.tool_calls,
            reasoning: self.reasoning,
            run_time: self.run_time,
        }
    }

    #[must_use]
    pub fn with_run_time(mut self, run_time: Duration) -> Self {
        self.run_time = Some(run_time);
        self
    }
}

impl LlmOutput {
    /// Text-only envelope whose output is its raw text.
    pub fn from_text(raw_text: impl Into<String>, usage: Usage) -> Self {
        let raw_text = raw_text.into();
        Self {
            output: raw_text.clone(),
            raw_text,
            usage,
            tool_calls: None,
            reasoning: None,
            run_time: None,
        }
    }
}
