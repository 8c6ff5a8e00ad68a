use std::{fmt, sync::Arc};

use bon::Builder;
use prompt_ox_common::{
    AuthMethod, Endpoint, HttpMethod, RequestBuilder, RequestConfig, RequestSender,
    default_sender,
};

use crate::{
    ChatRequest, ChatResponse, OpenAIRequestError,
    responses::{ResponsesRequest, ResponsesResponse},
};

pub const BASE_URL: &str = "https://api.openai.com/v1";
const CHAT_URL: &str = "chat/completions";
const RESPONSES_URL: &str = "responses";

/// OpenAI API client
#[derive(Clone, Builder)]
pub struct OpenAI {
    /// API key for authentication
    #[builder(into)]
    api_key: String,

    /// Base URL for the API (allows for custom endpoints)
    #[builder(default = BASE_URL.to_string(), into)]
    pub base_url: String,

    /// Transport used for every request
    #[builder(default = default_sender())]
    sender: Arc<dyn RequestSender>,
}

impl OpenAI {
    /// Create a new OpenAI client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new OpenAI client from environment variable
    ///
    /// # Errors
    ///
    /// Fails when `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Result<Self, OpenAIRequestError> {
        let api_key =
            std::env::var("OPENAI_API_KEY").map_err(|_| OpenAIRequestError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    fn request_builder(&self) -> RequestBuilder {
        let config =
            RequestConfig::new(&self.base_url).with_auth(AuthMethod::Bearer(self.api_key.clone()));
        RequestBuilder::new(Arc::clone(&self.sender), config)
    }

    /// Send a chat request and get a response
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-success replies and undecodable replies.
    pub async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, OpenAIRequestError> {
        let endpoint = Endpoint::new(CHAT_URL, HttpMethod::Post);
        Ok(self
            .request_builder()
            .request_json(&endpoint, Some(request))
            .await?)
    }

    /// Send a Responses API request
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-success replies and undecodable replies.
    pub async fn send_responses(
        &self,
        request: &ResponsesRequest,
    ) -> Result<ResponsesResponse, OpenAIRequestError> {
        let endpoint = Endpoint::new(RESPONSES_URL, HttpMethod::Post);
        Ok(self
            .request_builder()
            .request_json(&endpoint, Some(request))
            .await?)
    }
}

impl fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAI")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
