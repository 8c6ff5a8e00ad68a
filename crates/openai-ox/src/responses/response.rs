use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::request::SummaryPart;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    OutputText {
        text: String,
    },
    Refusal {
        refusal: String,
    },
    #[serde(other)]
    Other,
}

/// One decoded entry of [`ResponsesResponse::output`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    FunctionCall {
        #[serde(default)]
        id: Option<String>,
        call_id: String,
        name: String,
        arguments: String,
    },
    FunctionCallOutput {
        #[serde(default)]
        id: Option<String>,
        call_id: String,
        output: Value,
    },
    Reasoning {
        id: String,
        summary: Vec<SummaryPart>,
    },
    /// Hosted tool calls and other item kinds this crate does not model
    #[serde(other)]
    Other,
}

/// An output item that declared a kind but did not match its shape
#[derive(Debug)]
pub struct MalformedItem {
    pub kind: String,
    pub raw: Value,
    pub error: serde_json::Error,
}

/// Token usage reported by the Responses API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponsesUsage {
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: Option<u64>,
    pub total_tokens: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponsesResponse {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub status: Option<String>,
    pub model: String,
    #[serde(default)]
    pub output: Vec<Value>,
    #[serde(default)]
    pub usage: Option<ResponsesUsage>,
}

impl ResponsesResponse {
    /// Decode every output item independently, in order.
    pub fn items(&self) -> Vec<Result<OutputItem, MalformedItem>> {
        self.output
            .iter()
            .map(|raw| {
                serde_json::from_value::<OutputItem>(raw.clone()).map_err(|error| MalformedItem {
                    kind: raw
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or("<untyped>")
                        .to_string(),
                    raw: raw.clone(),
                    error,
                })
            })
            .collect()
    }

    /// All `output_text` parts joined with newlines
    pub fn output_text(&self) -> String {
        self.items()
            .into_iter()
            .filter_map(Result::ok)
            .filter_map(|item| match item {
                OutputItem::Message { content, .. } => Some(content),
                _ => None,
            })
            .flatten()
            .filter_map(|c| match c {
                OutputContent::OutputText { text } => Some(text),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
