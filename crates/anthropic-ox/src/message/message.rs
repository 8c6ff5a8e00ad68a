use std::fmt;

use base64::Engine;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::tool::{ToolResult, ToolUse};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    Base64 { media_type: String, data: String },
    Url { url: String },
}

impl ImageSource {
    /// Encode raw image bytes, e.g. `media_type = "image/png"`.
    pub fn from_bytes(media_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::Base64 {
            media_type: media_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Base64 { media_type, data } => {
                let truncated: String = data.chars().take(20).collect();
                write!(f, "Base64 ({media_type}, {truncated}...)")
            }
            ImageSource::Url { url } => write!(f, "Url ({url})"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Image {
    pub source: ImageSource,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Text {
    pub text: String,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Text { text }
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Text {
            text: text.to_owned(),
        }
    }
}

/// Extended-thinking block. The signature is opaque and echoed back verbatim.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ThinkingContent {
    pub thinking: String,
    #[serde(default)]
    pub signature: String,
}

impl ThinkingContent {
    pub fn new(thinking: impl Into<String>) -> Self {
        Self {
            thinking: thinking.into(),
            signature: String::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RedactedThinking {
    pub data: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text(Text),
    Image(Image),
    ToolUse(ToolUse),
    ToolResult(ToolResult),
    Thinking(ThinkingContent),
    RedactedThinking(RedactedThinking),
    /// Block types this crate does not model (server tools, citations, ...)
    #[serde(other)]
    Unknown,
}

impl Content {
    pub fn text<T: Into<String>>(text: T) -> Self {
        Self::Text(Text { text: text.into() })
    }

    pub fn image(source: ImageSource) -> Self {
        Self::Image(Image { source })
    }

    pub fn thinking(thinking: impl Into<String>) -> Self {
        Self::Thinking(ThinkingContent::new(thinking))
    }

    pub fn as_text(&self) -> Option<&Text> {
        if let Self::Text(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_tool_use(&self) -> Option<&ToolUse> {
        if let Self::ToolUse(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

impl From<Text> for Content {
    fn from(text: Text) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::text(text)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::text(text)
    }
}

impl From<ToolUse> for Content {
    fn from(tool_use: ToolUse) -> Self {
        Content::ToolUse(tool_use)
    }
}

impl From<ToolResult> for Content {
    fn from(tool_result: ToolResult) -> Self {
        Content::ToolResult(tool_result)
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(&text.text),
            Self::Image(image) => write!(f, "Image: {}", image.source),
            Self::ToolUse(tool_use) => fmt::Display::fmt(tool_use, f),
            Self::ToolResult(tool_result) => fmt::Display::fmt(tool_result, f),
            Self::Thinking(thinking) => write!(f, "Thinking: {}", thinking.thinking),
            Self::RedactedThinking(_) => f.write_str("RedactedThinking"),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Message content or a system prompt: the API accepts a bare string or a
/// list of blocks in both places.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum StringOrContents {
    String(String),
    Contents(Vec<Content>),
}

impl StringOrContents {
    pub fn into_contents(self) -> Vec<Content> {
        match self {
            Self::String(s) => vec![Content::text(s)],
            Self::Contents(contents) => contents,
        }
    }
}

impl From<String> for StringOrContents {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Content>> for StringOrContents {
    fn from(value: Vec<Content>) -> Self {
        Self::Contents(value)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: StringOrContents,
}

impl Message {
    pub fn new(role: Role, content: Vec<Content>) -> Self {
        Self {
            role,
            content: StringOrContents::Contents(content),
        }
    }

    pub fn user<T: Into<Content>>(content: Vec<T>) -> Self {
        Self::new(Role::User, content.into_iter().map(Into::into).collect())
    }

    pub fn assistant<T: Into<Content>>(content: Vec<T>) -> Self {
        Self::new(Role::Assistant, content.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.role)?;
        match &self.content {
            StringOrContents::String(s) => f.write_str(s),
            StringOrContents::Contents(contents) => {
                for (i, content) in contents.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{content}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Messages(pub Vec<Message>);

impl Messages {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push<T: Into<Message>>(&mut self, message: T) {
        self.0.push(message.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.0.iter()
    }

    pub fn last_mut(&mut self) -> Option<&mut Message> {
        self.0.last_mut()
    }
}

impl std::ops::Index<usize> for Messages {
    type Output = Message;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl FromIterator<Message> for Messages {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Messages {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thinking_round_trips_with_empty_signature() {
        let content = Content::thinking("step one");
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "thinking", "thinking": "step one", "signature": ""})
        );
    }

    #[test]
    fn unknown_block_types_do_not_fail_decoding() {
        let blocks: Vec<Content> = serde_json::from_str(
            r#"[{"type":"server_tool_use","id":"x","name":"web_search","input":{}},
                {"type":"text","text":"hi"}]"#,
        )
        .unwrap();
        assert_eq!(blocks[0], Content::Unknown);
        assert_eq!(blocks[1].as_text().map(Text::as_str), Some("hi"));
    }

    #[test]
    fn image_bytes_are_base64_encoded() {
        let source = ImageSource::from_bytes("image/png", b"abc");
        assert_eq!(
            source,
            ImageSource::Base64 {
                media_type: "image/png".to_string(),
                data: "YWJj".to_string()
            }
        );
    }
}
