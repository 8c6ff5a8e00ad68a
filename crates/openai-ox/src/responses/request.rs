use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputRole {
    System,
    Developer,
    User,
    Assistant,
}

/// Content parts accepted inside an input `message` item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContent {
    InputText {
        text: String,
    },
    InputImage {
        image_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    InputFile {
        file_id: String,
    },
    /// Prior assistant text replayed as history
    OutputText {
        text: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SummaryPart {
    SummaryText { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    Message {
        role: InputRole,
        content: Vec<InputContent>,
    },
    FunctionCall {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        call_id: String,
        name: String,
        /// JSON-encoded arguments
        arguments: String,
    },
    FunctionCallOutput {
        call_id: String,
        output: String,
    },
    Reasoning {
        id: String,
        summary: Vec<SummaryPart>,
    },
}

impl InputItem {
    pub fn message(role: InputRole, content: Vec<InputContent>) -> Self {
        Self::Message { role, content }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::FunctionCall { .. } => "function_call",
            Self::FunctionCallOutput { .. } => "function_call_output",
            Self::Reasoning { .. } => "reasoning",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReasoningConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<ReasoningEffort>,
    /// `auto`, `concise` or `detailed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextFormat {
    Text,
    JsonObject,
    JsonSchema {
        name: String,
        schema: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        strict: Option<bool>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextConfig {
    pub format: TextFormat,
}

/// Function tool for the Responses API. Unlike Chat Completions the
/// definition is flat rather than nested under `function`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponsesTool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl ResponsesTool {
    pub fn function(name: impl Into<String>, description: Option<String>, parameters: Value) -> Self {
        Self {
            tool_type: "function".to_string(),
            name: name.into(),
            description,
            parameters,
            strict: None,
        }
    }
}

/// Request for OpenAI Responses API
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct ResponsesRequest {
    #[builder(into)]
    pub model: String,
    pub input: Vec<InputItem>,
    /// Instructions for the model (system prompt)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ResponsesTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_exchange_items_match_wire_shape() {
        let items = vec![
            InputItem::FunctionCall {
                id: None,
                call_id: "call_1".into(),
                name: "scrape".into(),
                arguments: r#"{"url":"www.google.com"}"#.into(),
            },
            InputItem::FunctionCallOutput {
                call_id: "call_1".into(),
                output: "\"done\"".into(),
            },
        ];
        let json = serde_json::to_value(&items).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"type": "function_call", "call_id": "call_1", "name": "scrape", "arguments": "{\"url\":\"www.google.com\"}"},
                {"type": "function_call_output", "call_id": "call_1", "output": "\"done\""}
            ])
        );
    }

    #[test]
    fn reasoning_item_carries_summary_parts() {
        let item = InputItem::Reasoning {
            id: "rs_1".into(),
            summary: vec![SummaryPart::SummaryText {
                text: "first".into(),
            }],
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "reasoning", "id": "rs_1", "summary": [{"type": "summary_text", "text": "first"}]})
        );
    }

    #[test]
    fn request_serializes_reasoning_and_format() {
        let request = ResponsesRequest::builder()
            .model("o4-mini")
            .input(vec![InputItem::message(
                InputRole::User,
                vec![InputContent::InputText { text: "hi".into() }],
            )])
            .reasoning(ReasoningConfig {
                effort: Some(ReasoningEffort::Medium),
                summary: Some("auto".into()),
            })
            .text(TextConfig {
                format: TextFormat::JsonObject,
            })
            .store(true)
            .build();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["reasoning"]["effort"], "medium");
        assert_eq!(json["text"]["format"]["type"], "json_object");
        assert_eq!(json["input"][0]["content"][0]["type"], "input_text");
        assert_eq!(json["store"], true);
        assert!(json.get("instructions").is_none());
    }
}
