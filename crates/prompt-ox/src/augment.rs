//! Message-list rewriting applied before a runner sends a conversation.

use crate::{errors::LlmError, message::Message, template::PromptTemplate};

pub trait Augmenter: Send + Sync {
    /// Rewrites the conversation.
    ///
    /// # Errors
    ///
    /// Implementations fail when the conversation cannot be augmented.
    fn augment(&self, messages: Vec<Message>) -> Result<Vec<Message>, LlmError>;

    /// Renders `template` to a user message and augments it.
    ///
    /// # Errors
    ///
    /// Same as [`Augmenter::augment`].
    fn augment_template(&self, template: &PromptTemplate) -> Result<Vec<Message>, LlmError> {
        self.augment(vec![template.to_message()])
    }
}

/// Puts a system message first unless the conversation already has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPromptAugmenter {
    prompt: String,
}

impl SystemPromptAugmenter {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

impl Augmenter for SystemPromptAugmenter {
    fn augment(&self, mut messages: Vec<Message>) -> Result<Vec<Message>, LlmError> {
        if !messages.iter().any(|m| matches!(m, Message::System(_))) {
            messages.insert(0, Message::system(self.prompt.as_str()));
        }
        Ok(messages)
    }
}
