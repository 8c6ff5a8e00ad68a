use serde::{Deserialize, Serialize};

use crate::{message::Message, usage::Usage};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Choice {
    pub index: u32,
    pub message: Message,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: u64,
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Text content of the first choice, if any
    pub fn content(&self) -> Option<&str> {
        match self.choices.first()?.message.content.as_ref()? {
            crate::message::MessageContent::Text(text) => Some(text),
            crate::message::MessageContent::Parts(_) => None,
        }
    }
}
