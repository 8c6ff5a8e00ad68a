use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;

use crate::error::{self, CommonRequestError};

/// Default timeout applied by [`ReqwestSender`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(500);

/// HTTP method for API endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// A fully resolved request, ready to hand to a [`RequestSender`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

/// The transport seam every provider client goes through.
///
/// Implementations own their connection state. They must fail with a
/// [`CommonRequestError`] on any non-success status instead of returning the
/// error body as if it were a reply.
#[async_trait]
pub trait RequestSender: Send + Sync {
    /// Upper bound for a single [`RequestSender::send`] call.
    fn timeout(&self) -> Duration;

    /// Sends the request and returns the raw reply body.
    async fn send(&self, request: OutboundRequest) -> Result<Bytes, CommonRequestError>;
}

/// Shared default transport: a [`ReqwestSender`] with [`DEFAULT_TIMEOUT`].
#[must_use]
pub fn default_sender() -> Arc<dyn RequestSender> {
    Arc::new(ReqwestSender::new(DEFAULT_TIMEOUT))
}

/// [`RequestSender`] backed by a `reqwest::Client`.
#[derive(Clone, Default)]
pub struct ReqwestSender {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl ReqwestSender {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Some(timeout),
        }
    }

    /// Reuse an existing client, e.g. one configured with a proxy.
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout: Some(timeout),
        }
    }
}

#[async_trait]
impl RequestSender for ReqwestSender {
    fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    async fn send(&self, request: OutboundRequest) -> Result<Bytes, CommonRequestError> {
        let timeout = self.timeout();
        log::debug!("{:?} {}", request.method, request.url);

        let mut req = self
            .client
            .request(request.method.into(), &request.url)
            .timeout(timeout);
        for (key, value) in &request.headers {
            req = req.header(key, value);
        }
        if !request.body.is_empty() {
            req = req.body(request.body);
        }

        let res = req.send().await.map_err(|e| {
            if e.is_timeout() {
                CommonRequestError::Timeout(timeout)
            } else {
                CommonRequestError::Http(e)
            }
        })?;

        let status = res.status();
        let bytes = res.bytes().await.map_err(|e| {
            if e.is_timeout() {
                CommonRequestError::Timeout(timeout)
            } else {
                CommonRequestError::Http(e)
            }
        })?;

        if status.is_success() {
            Ok(bytes)
        } else {
            Err(error::parse_error_response(status.as_u16(), &bytes))
        }
    }
}

impl fmt::Debug for ReqwestSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestSender")
            .field("timeout", &self.timeout())
            .finish_non_exhaustive()
    }
}
