use std::{collections::HashMap, sync::Arc};

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::CommonRequestError,
    sender::{HttpMethod, OutboundRequest, RequestSender},
};

/// Authentication method for API requests
#[derive(Clone)]
pub enum AuthMethod {
    /// Bearer token authentication (Authorization: Bearer <token>)
    Bearer(String),
    /// API key header (e.g., x-api-key: <key>)
    ApiKey { header_name: String, key: String },
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer([REDACTED])"),
            Self::ApiKey { header_name, .. } => f
                .debug_struct("ApiKey")
                .field("header_name", header_name)
                .field("key", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Represents an API endpoint with its configuration
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub extra_headers: Option<HashMap<String, String>>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            extra_headers: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Configuration for request building
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub base_url: String,
    pub auth: Vec<AuthMethod>,
    pub default_headers: HashMap<String, String>,
}

impl RequestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: Vec::new(),
            default_headers: HashMap::new(),
        }
    }

    /// Adds an authentication scheme. Some gateways expect more than one.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthMethod) -> Self {
        self.auth.push(auth);
        self
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Joins the base URL and an endpoint path with exactly one slash.
    #[must_use]
    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        )
    }
}

/// Turns typed requests into [`OutboundRequest`]s and typed replies back out
/// of the bytes a [`RequestSender`] returns.
#[derive(Clone)]
pub struct RequestBuilder {
    sender: Arc<dyn RequestSender>,
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new(sender: Arc<dyn RequestSender>, config: RequestConfig) -> Self {
        Self { sender, config }
    }

    #[must_use]
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Build the outbound request for the given endpoint and optional JSON body.
    ///
    /// # Errors
    ///
    /// Fails when no authentication is configured or the body cannot be
    /// serialized.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> Result<OutboundRequest, CommonRequestError> {
        if self.config.auth.is_empty() {
            return Err(CommonRequestError::AuthenticationMissing);
        }

        let mut headers = HashMap::new();
        for auth in &self.config.auth {
            match auth {
                AuthMethod::Bearer(token) => {
                    headers.insert("authorization".to_string(), format!("Bearer {token}"));
                }
                AuthMethod::ApiKey { header_name, key } => {
                    headers.insert(header_name.clone(), key.clone());
                }
            }
        }
        for (key, value) in &self.config.default_headers {
            headers.insert(key.clone(), value.clone());
        }
        if let Some(ref extra) = endpoint.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let body = match body {
            Some(body) => {
                // Normalize through Value so the trace shows exactly what is sent.
                let value = serde_json::to_value(body)?;
                log::trace!("{:?} {} payload: {}", endpoint.method, endpoint.path, value);
                headers.insert("content-type".to_string(), "application/json".to_string());
                Bytes::from(serde_json::to_vec(&value)?)
            }
            None => Bytes::new(),
        };

        Ok(OutboundRequest {
            method: endpoint.method,
            url: self.config.url_for(endpoint),
            headers,
            body,
        })
    }

    /// Execute a request with JSON body and return deserialized response
    ///
    /// # Errors
    ///
    /// Propagates transport failures and fails with
    /// [`CommonRequestError::Json`] when the reply does not decode into `T`.
    pub async fn request_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> Result<T, CommonRequestError> {
        let request = self.build_request(endpoint, body)?;
        let bytes = self.sender.send(request).await?;
        log::trace!("{} reply: {}", endpoint.path, String::from_utf8_lossy(&bytes));
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("config", &self.config)
            .field("timeout", &self.sender.timeout())
            .finish_non_exhaustive()
    }
}
