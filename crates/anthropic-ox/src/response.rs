use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    message::{Content, Role, ThinkingContent},
    tool::ToolUse,
    usage::Usage,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
    PauseTurn,
    Refusal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub id: String,
    pub r#type: String,
    pub role: Role,
    /// Raw content blocks. Use [`ChatResponse::blocks`] to decode them.
    pub content: Vec<Value>,
    pub model: String,
    pub stop_reason: Option<StopReason>,
    pub stop_sequence: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

/// A content block that did not match its declared shape.
#[derive(Debug)]
pub struct MalformedBlock {
    pub kind: String,
    pub raw: Value,
    pub error: serde_json::Error,
}

impl ChatResponse {
    /// Decode every content block independently, in order.
    pub fn blocks(&self) -> Vec<Result<Content, MalformedBlock>> {
        self.content
            .iter()
            .map(|raw| {
                serde_json::from_value::<Content>(raw.clone()).map_err(|error| MalformedBlock {
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

    pub fn text_content(&self) -> Vec<String> {
        self.blocks()
            .into_iter()
            .filter_map(|block| match block {
                Ok(Content::Text(text)) => Some(text.text),
                _ => None,
            })
            .collect()
    }

    pub fn tool_uses(&self) -> Vec<ToolUse> {
        self.blocks()
            .into_iter()
            .filter_map(|block| match block {
                Ok(Content::ToolUse(tool_use)) => Some(tool_use),
                _ => None,
            })
            .collect()
    }

    pub fn thinking_blocks(&self) -> Vec<ThinkingContent> {
        self.blocks()
            .into_iter()
            .filter_map(|block| match block {
                Ok(Content::Thinking(thinking)) => Some(thinking),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_with_mixed_blocks() {
        let json = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-0",
            "content": [
                {"type": "thinking", "thinking": "Look it up.", "signature": "sig"},
                {"type": "text", "text": "Let me check."},
                {"type": "tool_use", "id": "toolu_1", "name": "scrape", "input": {"url": "www.google.com"}}
            ],
            "stop_reason": "tool_use",
            "stop_sequence": null,
            "usage": {"input_tokens": 12, "output_tokens": 30}
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text_content(), vec!["Let me check."]);
        assert_eq!(response.tool_uses().len(), 1);
        assert_eq!(response.thinking_blocks()[0].signature, "sig");
        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(response.usage.total_tokens(), 42);
    }

    #[test]
    fn test_malformed_block_is_isolated() {
        let json = r#"{
            "id": "msg_02",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-0",
            "content": [
                {"type": "tool_use", "id": "toolu_1", "name": "scrape"},
                {"type": "text", "text": "Done."}
            ],
            "stop_reason": "end_turn",
            "stop_sequence": null,
            "usage": {"input_tokens": 5, "output_tokens": 2}
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        let blocks = response.blocks();
        assert_eq!(blocks.len(), 2);
        let malformed = blocks[0].as_ref().unwrap_err();
        assert_eq!(malformed.kind, "tool_use");
        assert_eq!(response.text_content(), vec!["Done."]);
        assert!(response.tool_uses().is_empty());
    }
}
