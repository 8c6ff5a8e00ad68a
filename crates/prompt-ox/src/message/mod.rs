use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{content::Content, tool::ToolCallExchange};

/// Who produced a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Author {
    System,
    User,
    Ai,
    Tool,
    Thinking,
}

/// Provider "thinking" text, in the order it was emitted.
///
/// An empty `reasoning` list is a valid, empty item; it is not the same as
/// having no reasoning item at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub reasoning: Vec<String>,
}

impl ReasoningItem {
    pub fn new(id: Option<String>, reasoning: Vec<String>) -> Self {
        Self { id, reasoning }
    }

    pub fn is_empty(&self) -> bool {
        self.reasoning.iter().all(String::is_empty)
    }

    pub fn text(&self) -> String {
        self.reasoning.join("\n")
    }
}

/// One conversation turn. Order within a conversation is turn order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "snake_case")]
pub enum Message {
    System(Content),
    User(Content),
    Ai(Content),
    Tool(ToolCallExchange),
    Thinking(ReasoningItem),
}

impl Message {
    pub fn system(content: impl Into<Content>) -> Self {
        Self::System(content.into())
    }

    pub fn user(content: impl Into<Content>) -> Self {
        Self::User(content.into())
    }

    pub fn ai(content: impl Into<Content>) -> Self {
        Self::Ai(content.into())
    }

    pub fn author(&self) -> Author {
        match self {
            Self::System(_) => Author::System,
            Self::User(_) => Author::User,
            Self::Ai(_) => Author::Ai,
            Self::Tool(_) => Author::Tool,
            Self::Thinking(_) => Author::Thinking,
        }
    }

    pub fn text(&self) -> String {
        match self {
            Self::System(content) | Self::User(content) | Self::Ai(content) => {
                content.text_representation()
            }
            Self::Tool(exchange) => exchange.to_string(),
            Self::Thinking(item) => item.text(),
        }
    }

    pub fn content(&self) -> Option<&Content> {
        match self {
            Self::System(content) | Self::User(content) | Self::Ai(content) => Some(content),
            Self::Tool(_) | Self::Thinking(_) => None,
        }
    }
}

impl From<ToolCallExchange> for Message {
    fn from(value: ToolCallExchange) -> Self {
        Self::Tool(value)
    }
}

impl From<ReasoningItem> for Message {
    fn from(value: ReasoningItem) -> Self {
        Self::Thinking(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolCallRequest;
    use serde_json::Map;

    #[test]
    fn author_and_text_are_total() {
        let exchange = ToolCallExchange::from_request(ToolCallRequest::new(
            "fc_1",
            "call_1",
            "scrape",
            Map::new(),
        ));
        let messages = [
            (Message::system("be terse"), Author::System, "be terse"),
            (Message::user("hi"), Author::User, "hi"),
            (Message::ai("hello"), Author::Ai, "hello"),
            (
                Message::Tool(exchange),
                Author::Tool,
                "Called Tool: scrape with {}",
            ),
            (
                Message::Thinking(ReasoningItem::new(None, vec!["a".into(), "b".into()])),
                Author::Thinking,
                "a\nb",
            ),
        ];
        for (message, author, text) in messages {
            assert_eq!(message.author(), author);
            assert_eq!(message.text(), text);
        }
        assert_eq!(Author::Ai.to_string(), "ai");
    }

    #[test]
    fn empty_reasoning_is_distinct_from_absent() {
        let empty = ReasoningItem::default();
        assert!(empty.is_empty());
        assert!(!ReasoningItem::new(None, vec!["x".into()]).is_empty());
    }

    #[test]
    fn messages_serialize_with_role_tag() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "user", "content": {"type": "text", "content": "hi"}})
        );
    }
}
