use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::LocalError;

/// Sampling settings handed to [`LocalBackend::generate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct GenerateParameters {
    /// Generation stops after this many tokens.
    #[builder(default = 10_000)]
    pub max_tokens: usize,
    #[builder(default = 0.6)]
    pub temperature: f32,
    #[builder(default = 1.0)]
    pub top_p: f32,
    pub repetition_penalty: Option<f32>,
    /// Number of recent tokens the repetition penalty looks at.
    #[builder(default = 20)]
    pub repetition_context_size: usize,
    #[builder(default)]
    pub seed: u64,
}

impl Default for GenerateParameters {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry of the `[{role, content}]` list a chat template consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

pub trait Tokenizer: Send + Sync {
    /// Renders the turns with the model's chat template and tokenizes them.
    ///
    /// # Errors
    ///
    /// Fails when the template cannot be applied.
    fn apply_chat_template(&self, turns: &[ChatTurn]) -> Result<Vec<u32>, LocalError>;

    /// # Errors
    ///
    /// Fails on token ids outside the vocabulary.
    fn decode(&self, tokens: &[u32]) -> Result<String, LocalError>;
}

/// A model handle and its tokenizer, as returned by [`LocalBackend::load`].
pub struct LoadedModel<M> {
    pub model: M,
    pub tokenizer: Box<dyn Tokenizer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub completed: u64,
    pub total: u64,
}

impl DownloadProgress {
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// Returned by the per-token callback to continue or end generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateDisposition {
    More,
    Stop,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub prompt_tokens: usize,
    /// Generated token ids, prompt excluded.
    pub tokens: Vec<u32>,
    pub text: String,
    pub prompt_time: Duration,
    pub generate_time: Duration,
}

impl GenerationResult {
    #[allow(clippy::cast_precision_loss)]
    pub fn prompt_tokens_per_second(&self) -> f64 {
        per_second(self.prompt_tokens as f64, self.prompt_time)
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn tokens_per_second(&self) -> f64 {
        per_second(self.tokens.len() as f64, self.generate_time)
    }
}

fn per_second(count: f64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 { 0.0 } else { count / secs }
}

/// On-device inference engine: storage, loading and token generation.
#[async_trait]
pub trait LocalBackend: Send + Sync {
    type Model: Send + Sync;

    /// True when the model files are present and complete.
    fn is_model_available(&self) -> bool;

    async fn download(
        &self,
    ) -> Result<BoxStream<'static, Result<DownloadProgress, LocalError>>, LocalError>;

    async fn delete(&self) -> Result<(), LocalError>;

    async fn load(&self) -> Result<LoadedModel<Self::Model>, LocalError>;

    /// Generates from `prompt_tokens`, calling `on_token` with every token
    /// generated so far after each step.
    async fn generate(
        &self,
        model: &LoadedModel<Self::Model>,
        prompt_tokens: Vec<u32>,
        parameters: &GenerateParameters,
        on_token: &mut (dyn for<'t> FnMut(&'t [u32]) -> GenerateDisposition + Send),
    ) -> Result<GenerationResult, LocalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_defaults() {
        let params = GenerateParameters::default();
        assert_eq!(params.max_tokens, 10_000);
        assert!((params.temperature - 0.6).abs() < f32::EPSILON);
        assert!((params.top_p - 1.0).abs() < f32::EPSILON);
        assert_eq!(params.repetition_penalty, None);
        assert_eq!(params.repetition_context_size, 20);
        assert_eq!(params.seed, 0);
    }

    #[test]
    fn rates_handle_zero_time() {
        let result = GenerationResult {
            prompt_tokens: 10,
            tokens: vec![1, 2, 3, 4],
            text: String::new(),
            prompt_time: Duration::ZERO,
            generate_time: Duration::from_secs(2),
        };
        assert!(result.prompt_tokens_per_second().abs() < f64::EPSILON);
        assert!((result.tokens_per_second() - 2.0).abs() < f64::EPSILON);
    }
}
