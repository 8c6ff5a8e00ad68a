use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{message::Message, tool::Tool};

/// Named JSON schema for structured output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
    JsonSchema { json_schema: JsonSchemaFormat },
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct ChatRequest {
    #[builder(into)]
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_schema_format_matches_wire_shape() {
        let request = ChatRequest::builder()
            .model("gpt-4o")
            .messages(vec![Message::user("hi")])
            .response_format(ResponseFormat::JsonSchema {
                json_schema: JsonSchemaFormat {
                    name: "Capital".to_string(),
                    schema: serde_json::json!({"type": "object"}),
                    strict: Some(true),
                },
            })
            .stop(vec!["END".to_string()])
            .build();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["response_format"],
            serde_json::json!({
                "type": "json_schema",
                "json_schema": {"name": "Capital", "schema": {"type": "object"}, "strict": true}
            })
        );
        assert_eq!(json["stop"], serde_json::json!(["END"]));
        assert!(json.get("temperature").is_none());
    }
}
