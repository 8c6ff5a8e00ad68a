#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(clippy::pedantic, clippy::unwrap_used)]

//! Types and a thin client for the Anthropic Messages protocol.
//!
//! xAI serves the same protocol, so the client takes a base URL and an
//! optional bearer header instead of hard-coding Anthropic's host.

pub mod error;
pub mod message;
pub mod request;
pub mod response;
pub mod tool;
pub mod usage;

pub use error::AnthropicRequestError;
pub use request::ChatRequest;
pub use response::{ChatResponse, MalformedBlock};

use std::{fmt, sync::Arc};

use bon::Builder;
use prompt_ox_common::{
    AuthMethod, Endpoint, HttpMethod, RequestBuilder, RequestConfig, RequestSender,
    default_sender,
};

pub const BASE_URL: &str = "https://api.anthropic.com";
const CHAT_URL: &str = "v1/messages";
const API_VERSION: &str = "2023-06-01";

#[derive(Clone, Builder)]
pub struct Anthropic {
    #[builder(into)]
    pub(crate) api_key: String,
    #[builder(default = default_sender())]
    pub(crate) sender: Arc<dyn RequestSender>,
    #[builder(default = BASE_URL.to_string(), into)]
    pub(crate) base_url: String,
    #[builder(default = API_VERSION.to_string(), into)]
    pub(crate) api_version: String,
    /// Also send the key as `Authorization: Bearer`, which xAI expects.
    #[builder(default)]
    pub(crate) bearer_auth: bool,
}

impl Anthropic {
    /// Create a new Anthropic client with the provided API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder().api_key(api_key).build()
    }

    pub fn load_from_env() -> Result<Self, std::env::VarError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")?;
        Ok(Self::new(api_key))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_builder(&self) -> RequestBuilder {
        let mut config = RequestConfig::new(&self.base_url)
            .with_auth(AuthMethod::ApiKey {
                header_name: "x-api-key".to_string(),
                key: self.api_key.clone(),
            })
            .with_header("anthropic-version", &self.api_version);
        if self.bearer_auth {
            config = config.with_auth(AuthMethod::Bearer(self.api_key.clone()));
        }
        RequestBuilder::new(Arc::clone(&self.sender), config)
    }

    /// Sends a Messages request.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-success replies (typed where the body
    /// names an Anthropic error type) and undecodable replies.
    pub async fn send(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, AnthropicRequestError> {
        let endpoint = Endpoint::new(CHAT_URL, HttpMethod::Post);
        Ok(self
            .request_builder()
            .request_json(&endpoint, Some(request))
            .await?)
    }
}

impl fmt::Debug for Anthropic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Anthropic")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("bearer_auth", &self.bearer_auth)
            .finish_non_exhaustive()
    }
}
