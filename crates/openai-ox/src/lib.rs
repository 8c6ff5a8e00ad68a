//! OpenAI API types and client for Rust
//!
//! Two endpoints are covered:
//! - Chat Completions (`/chat/completions`), the plain text protocol
//! - Responses (`/responses`), which carries tool calls, reasoning items and
//!   structured output
//!
//! Transport goes through a [`prompt_ox_common::RequestSender`].
//!
//! # Example
//!
//! ```rust,no_run
//! use openai_ox::{ChatRequest, Message, OpenAI};
//!
//! # async fn run() -> Result<(), openai_ox::OpenAIRequestError> {
//! let client = OpenAI::new("your-api-key");
//! let request = ChatRequest::builder()
//!     .model("gpt-4o")
//!     .messages(vec![Message::user("Hello, world!")])
//!     .build();
//!
//! let response = client.send(&request).await?;
//! println!("{}", response.content().unwrap_or("No content"));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod message;
pub mod request;
pub mod response;
pub mod responses;
pub mod tool;
pub mod usage;

pub use client::OpenAI;
pub use error::OpenAIRequestError;
pub use message::{ContentPart, Message, MessageContent, Role};
pub use request::{ChatRequest, JsonSchemaFormat, ResponseFormat};
pub use response::{ChatResponse, Choice};
pub use tool::{FunctionCall, FunctionDefinition, Tool, ToolCall};
pub use usage::Usage;
