//! On-device inference behind the [`Llm`] interface.
//!
//! The engine itself is a [`LocalBackend`] supplied by the caller. This
//! module turns messages into chat-template turns, keeps the loaded model
//! cached and enforces the token limit and stop strings.

mod backend;
mod error;

pub use backend::{
    ChatRole, ChatTurn, DownloadProgress, GenerateDisposition, GenerateParameters,
    GenerationResult, LoadedModel, LocalBackend, Tokenizer,
};
pub use error::LocalError;

use std::{fmt, sync::Arc};

use futures_util::{FutureExt, StreamExt, future::BoxFuture, stream::BoxStream};
use tokio::sync::Mutex;

use crate::{
    errors::LlmError,
    format::{ApiType, ResponseFormat},
    message::Message,
    model::{Llm, segments::text_only},
    output::LlmOutput,
    usage::Usage,
};

pub struct LocalModel<B: LocalBackend> {
    backend: B,
    model_id: String,
    parameters: GenerateParameters,
    loaded: Mutex<Option<Arc<LoadedModel<B::Model>>>>,
}

impl<B: LocalBackend> LocalModel<B> {
    pub fn new(backend: B, model_id: impl Into<String>) -> Self {
        Self::with_parameters(backend, model_id, GenerateParameters::default())
    }

    pub fn with_parameters(
        backend: B,
        model_id: impl Into<String>,
        parameters: GenerateParameters,
    ) -> Self {
        Self {
            backend,
            model_id: model_id.into(),
            parameters,
            loaded: Mutex::new(None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn parameters(&self) -> &GenerateParameters {
        &self.parameters
    }

    pub fn is_model_downloaded(&self) -> bool {
        self.backend.is_model_available()
    }

    /// # Errors
    ///
    /// Fails when the backend cannot start the download.
    pub async fn download_model(
        &self,
    ) -> Result<BoxStream<'static, Result<DownloadProgress, LocalError>>, LocalError> {
        self.backend.download().await
    }

    /// Deletes the model files. A loaded model stays usable until [`Self::unload`].
    ///
    /// # Errors
    ///
    /// Fails when the backend cannot remove the files.
    pub async fn delete_model(&self) -> Result<(), LocalError> {
        self.backend.delete().await
    }

    /// Drops the cached model. The next call loads it again.
    pub async fn unload(&self) {
        self.loaded.lock().await.take();
    }

    /// The cached model, downloading and loading it on first use.
    ///
    /// The lock is held for the whole load, so concurrent first calls load
    /// the model once.
    async fn model(&self) -> Result<Arc<LoadedModel<B::Model>>, LocalError> {
        let mut cached = self.loaded.lock().await;
        if let Some(model) = cached.as_ref() {
            return Ok(Arc::clone(model));
        }

        if !self.backend.is_model_available() {
            log::info!("downloading {}", self.model_id);
            let mut progress = self.backend.download().await?;
            while let Some(step) = progress.next().await {
                let step = step?;
                log::info!(
                    "downloading {}: {:.0}%",
                    self.model_id,
                    step.fraction() * 100.0
                );
            }
        }

        let model = Arc::new(self.backend.load().await?);
        *cached = Some(Arc::clone(&model));
        Ok(model)
    }

    async fn generate(
        &self,
        messages: &[Message],
        stops: &[String],
    ) -> Result<Option<LlmOutput>, LlmError> {
        let turns = chat_turns(messages)?;
        let model = self.model().await?;
        let prompt_tokens = model.tokenizer.apply_chat_template(&turns)?;

        let max_tokens = self.parameters.max_tokens;
        let tokenizer = model.tokenizer.as_ref();
        let mut decode_error = None;
        let mut on_token = |tokens: &[u32]| {
            if tokens.len() >= max_tokens {
                return GenerateDisposition::Stop;
            }
            if stops.is_empty() {
                return GenerateDisposition::More;
            }
            match tokenizer.decode(tokens) {
                Ok(text) if stops.iter().any(|stop| text.ends_with(stop.as_str())) => {
                    GenerateDisposition::Stop
                }
                Ok(_) => GenerateDisposition::More,
                Err(e) => {
                    decode_error = Some(e);
                    GenerateDisposition::Stop
                }
            }
        };

        let result = self
            .backend
            .generate(&model, prompt_tokens, &self.parameters, &mut on_token)
            .await?;
        if let Some(e) = decode_error {
            return Err(e.into());
        }

        log::info!(
            "prompt: {} tokens, {:.1} tokens/s; generation: {} tokens, {:.1} tokens/s, {:.2}s",
            result.prompt_tokens,
            result.prompt_tokens_per_second(),
            result.tokens.len(),
            result.tokens_per_second(),
            result.generate_time.as_secs_f64()
        );

        if result.tokens.is_empty() && result.text.is_empty() {
            return Ok(None);
        }
        let text = trim_stop(&result.text, stops);
        let usage = Usage::from_counts(result.prompt_tokens as u64, result.tokens.len() as u64);
        Ok(Some(LlmOutput::from_text(text, usage)))
    }
}

/// Chat-template turns. System text goes in as a user turn, the way local
/// chat templates expect it.
fn chat_turns(messages: &[Message]) -> Result<Vec<ChatTurn>, LlmError> {
    let mut turns = Vec::with_capacity(messages.len());
    for message in messages {
        match message {
            Message::System(content) | Message::User(content) => {
                turns.push(ChatTurn::new(ChatRole::User, text_only(content)?));
            }
            Message::Ai(content) => {
                turns.push(ChatTurn::new(ChatRole::Assistant, text_only(content)?));
            }
            Message::Tool(_) | Message::Thinking(_) => {
                log::debug!("local models omit {} turns", message.author());
            }
        }
    }
    Ok(turns)
}

fn trim_stop<'a>(text: &'a str, stops: &[String]) -> &'a str {
    stops
        .iter()
        .find_map(|stop| text.strip_suffix(stop.as_str()))
        .unwrap_or(text)
}

impl<B: LocalBackend> Llm for LocalModel<B> {
    fn model(&self) -> &str {
        &self.model_id
    }

    fn infer<'a>(
        &'a self,
        messages: &'a [Message],
        stops: &'a [String],
        response_format: &'a ResponseFormat,
        api_type: ApiType,
    ) -> BoxFuture<'a, Result<Option<LlmOutput>, LlmError>> {
        async move {
            if *response_format != ResponseFormat::Text {
                log::debug!("local models have no response format control; relying on the prompt");
            }
            if api_type == ApiType::Advanced {
                log::debug!("local models only speak the standard protocol");
            }
            self.generate(messages, stops).await
        }
        .boxed()
    }
}

impl<B: LocalBackend> fmt::Debug for LocalModel<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalModel")
            .field("model_id", &self.model_id)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
