use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use anthropic_ox::{
    Anthropic, AnthropicRequestError, ChatRequest,
    error::ErrorKind,
    message::{Content, Message},
};
use prompt_ox_common::{Bytes, CommonRequestError, OutboundRequest, RequestSender, async_trait};

struct CannedSender {
    reply: Result<&'static str, (u16, &'static str)>,
    seen: Mutex<Vec<OutboundRequest>>,
}

impl CannedSender {
    fn ok(body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(body),
            seen: Mutex::default(),
        })
    }

    fn status(status: u16, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err((status, body)),
            seen: Mutex::default(),
        })
    }
}

#[async_trait]
impl RequestSender for CannedSender {
    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    async fn send(&self, request: OutboundRequest) -> Result<Bytes, CommonRequestError> {
        self.seen.lock().unwrap().push(request);
        match self.reply {
            Ok(body) => Ok(Bytes::from_static(body.as_bytes())),
            Err((status, body)) => Err(prompt_ox_common::error::parse_error_response(
                status,
                body.as_bytes(),
            )),
        }
    }
}

const REPLY: &str = r#"{
    "id": "msg_01",
    "type": "message",
    "role": "assistant",
    "model": "claude-sonnet-4-0",
    "content": [{"type": "text", "text": "Paris."}],
    "stop_reason": "end_turn",
    "stop_sequence": null,
    "usage": {"input_tokens": 10, "output_tokens": 3}
}"#;

fn request() -> ChatRequest {
    ChatRequest::builder()
        .model("claude-sonnet-4-0")
        .message(Message::user(vec![Content::text("Capital of France?")]))
        .build()
}

#[tokio::test]
async fn test_send_sets_protocol_headers() {
    let sender = CannedSender::ok(REPLY);
    let client = Anthropic::builder()
        .api_key("sk-test")
        .sender(sender.clone())
        .build();

    let response = client.send(&request()).await.expect("send should succeed");
    assert_eq!(response.text_content(), vec!["Paris."]);

    let seen = sender.seen.lock().unwrap();
    let outbound = &seen[0];
    assert_eq!(outbound.url, "https://api.anthropic.com/v1/messages");
    assert_eq!(outbound.headers["x-api-key"], "sk-test");
    assert_eq!(outbound.headers["anthropic-version"], "2023-06-01");
    assert!(!outbound.headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_bearer_auth_for_compatible_gateways() {
    let sender = CannedSender::ok(REPLY);
    let client = Anthropic::builder()
        .api_key("xai-key")
        .base_url("https://api.x.ai")
        .bearer_auth(true)
        .sender(sender.clone())
        .build();

    client.send(&request()).await.expect("send should succeed");

    let seen = sender.seen.lock().unwrap();
    assert_eq!(seen[0].url, "https://api.x.ai/v1/messages");
    assert_eq!(seen[0].headers["authorization"], "Bearer xai-key");
}

#[tokio::test]
async fn test_api_errors_are_typed() {
    let sender = CannedSender::status(
        401,
        r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#,
    );
    let client = Anthropic::builder().api_key("bad").sender(sender).build();

    let err = client.send(&request()).await.unwrap_err();
    assert!(matches!(err, AnthropicRequestError::Authentication(ref m) if m == "invalid x-api-key"));
    assert_eq!(err.kind(), ErrorKind::Auth);
}
