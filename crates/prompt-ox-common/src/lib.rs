#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(clippy::pedantic, clippy::unwrap_used)]

//! Shared transport plumbing for prompt-ox provider clients
//!
//! Provider crates never talk to an HTTP client directly. They build an
//! [`OutboundRequest`] with a [`RequestBuilder`] and hand it to whatever
//! [`RequestSender`] the caller supplied, so the transport can be swapped
//! for a recording fake in tests or for a host framework's client.

pub mod error;
pub mod request_builder;
pub mod sender;

pub use error::CommonRequestError;
pub use request_builder::{AuthMethod, Endpoint, RequestBuilder, RequestConfig};
pub use sender::{
    DEFAULT_TIMEOUT, HttpMethod, OutboundRequest, ReqwestSender, RequestSender, default_sender,
};

/// Re-export common types for convenience
pub use async_trait::async_trait;
pub use bytes::Bytes;
