pub mod message;

pub use crate::tool::{ToolResult, ToolResultContent, ToolUse};
pub use message::{
    Content, Image, ImageSource, Message, Messages, RedactedThinking, Role, StringOrContents,
    Text, ThinkingContent,
};
