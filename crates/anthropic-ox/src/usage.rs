use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_creation_input_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_input_tokens: Option<u32>,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens.unwrap_or(0) + self.output_tokens.unwrap_or(0)
    }

    /// Prompt tokens in the vocabulary of the other providers
    pub fn prompt_tokens(&self) -> u32 {
        self.input_tokens.unwrap_or(0)
    }

    /// Completion tokens in the vocabulary of the other providers
    pub fn completion_tokens(&self) -> u32 {
        self.output_tokens.unwrap_or(0)
    }
}
