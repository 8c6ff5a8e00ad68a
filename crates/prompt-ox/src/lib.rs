#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(clippy::pedantic, clippy::unwrap_used)]

//! Provider-agnostic prompt running.
//!
//! A conversation is a list of [`Message`]s. An [`Llm`] adapter maps it onto
//! one provider's wire protocol and maps the reply back into an
//! [`ExchangeOutput`]. Runners in [`runner`] sit on top and add timing and
//! output decoding.
//!
//! ```rust,no_run
//! use prompt_ox::{BasicPromptRunner, Message, PromptRunner, model::openai::OpenAiModel};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = OpenAiModel::builder()
//!     .api_key("sk-...")
//!     .model("gpt-4o-mini")
//!     .build();
//!
//! let output = BasicPromptRunner::default()
//!     .run(
//!         vec![
//!             Message::system("You are terse"),
//!             Message::user("What is the capital of France?"),
//!         ],
//!         &llm,
//!     )
//!     .await?;
//! println!("{} ({} tokens)", output.output, output.usage.total_tokens);
//! # Ok(())
//! # }
//! ```

pub mod augment;
pub mod content;
pub mod errors;
pub mod format;
pub mod message;
pub mod model;
pub mod output;
pub mod runner;
pub mod template;
pub mod tool;
pub mod usage;

pub use augment::{Augmenter, SystemPromptAugmenter};
pub use content::Content;
pub use errors::LlmError;
pub use format::{ApiType, ResponseFormat};
pub use message::{Author, Message, ReasoningItem};
pub use model::{Llm, ThinkingLevel, ToolArgumentPolicy};
pub use output::{ExchangeOutput, LlmOutput};
pub use runner::{
    BasicPromptRunner, JsonSchemaPromptRunner, PromptRunner, RunnerError,
    ToolCapablePromptRunner,
};
pub use template::PromptTemplate;
pub use tool::{
    ToolCallExchange, ToolCallRequest, ToolCallResponse, ToolDefinition, ToolExchangeError,
};
pub use usage::Usage;

pub use prompt_ox_common::{RequestSender, ReqwestSender};
