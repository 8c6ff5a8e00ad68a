use serde::{Deserialize, Serialize};

/// Token usage reported by Chat Completions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u64,
    /// Absent on some compatible servers
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    pub total_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens_details: Option<CompletionTokensDetails>,
}

/// Detailed completion token usage
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionTokensDetails {
    /// Tokens used for reasoning (if applicable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u64>,
}

impl Usage {
    pub fn completion_tokens(&self) -> u64 {
        self.completion_tokens.unwrap_or(0)
    }
}
