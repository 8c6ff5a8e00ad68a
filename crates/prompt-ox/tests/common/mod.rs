#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use futures_util::{FutureExt, future::BoxFuture};
use prompt_ox::{ApiType, Llm, LlmError, LlmOutput, Message, ResponseFormat};
use prompt_ox_common::{Bytes, CommonRequestError, OutboundRequest, RequestSender, async_trait};
use serde_json::Value;

/// Replays canned provider bodies in order and keeps every request it saw.
#[derive(Default)]
pub struct RecordingSender {
    replies: Mutex<VecDeque<Result<String, (u16, String)>>>,
    seen: Mutex<Vec<OutboundRequest>>,
}

impl RecordingSender {
    pub fn replying(body: impl Into<String>) -> Arc<Self> {
        let sender = Self::default();
        sender.push_ok(body);
        Arc::new(sender)
    }

    pub fn failing(status: u16, body: impl Into<String>) -> Arc<Self> {
        let sender = Self::default();
        sender
            .replies
            .lock()
            .unwrap()
            .push_back(Err((status, body.into())));
        Arc::new(sender)
    }

    pub fn push_ok(&self, body: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(body.into()));
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// The JSON body of the only request sent.
    pub fn single_body(&self) -> Value {
        let seen = self.seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "expected exactly one request");
        serde_json::from_slice(&seen[0].body).unwrap()
    }
}

#[async_trait]
impl RequestSender for RecordingSender {
    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    async fn send(&self, request: OutboundRequest) -> Result<Bytes, CommonRequestError> {
        self.seen.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no canned reply left");
        match reply {
            Ok(body) => Ok(Bytes::from(body)),
            Err((status, body)) => Err(prompt_ox_common::error::parse_error_response(
                status,
                body.as_bytes(),
            )),
        }
    }
}

/// Adapter double for runner tests.
pub struct ScriptedLlm {
    reply: Option<LlmOutput>,
    calls: Mutex<Vec<(Vec<Message>, ResponseFormat, ApiType)>>,
}

impl ScriptedLlm {
    pub fn new(reply: Option<LlmOutput>) -> Self {
        Self {
            reply,
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<Message>, ResponseFormat, ApiType)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Llm for ScriptedLlm {
    fn model(&self) -> &str {
        "scripted"
    }

    fn infer<'a>(
        &'a self,
        messages: &'a [Message],
        _stops: &'a [String],
        response_format: &'a ResponseFormat,
        api_type: ApiType,
    ) -> BoxFuture<'a, Result<Option<LlmOutput>, LlmError>> {
        async move {
            self.calls
                .lock()
                .unwrap()
                .push((messages.to_vec(), response_format.clone(), api_type));
            Ok(self.reply.clone())
        }
        .boxed()
    }
}
