use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use openai_ox::{
    ChatRequest, Message, OpenAI, OpenAIRequestError,
    responses::{InputContent, InputItem, InputRole, OutputItem, ResponsesRequest},
};
use prompt_ox_common::{Bytes, CommonRequestError, OutboundRequest, RequestSender, async_trait};

struct CannedSender {
    status: u16,
    body: &'static str,
    seen: Mutex<Vec<OutboundRequest>>,
}

impl CannedSender {
    fn new(status: u16, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
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
        if self.status == 200 {
            Ok(Bytes::from_static(self.body.as_bytes()))
        } else {
            Err(prompt_ox_common::error::parse_error_response(
                self.status,
                self.body.as_bytes(),
            ))
        }
    }
}

const CHAT_REPLY: &str = r#"{
    "id": "chatcmpl-1",
    "object": "chat.completion",
    "created": 1741476542,
    "model": "gpt-4o",
    "choices": [{
        "index": 0,
        "message": {"role": "assistant", "content": "Paris."},
        "finish_reason": "stop"
    }],
    "usage": {"prompt_tokens": 20, "completion_tokens": 2, "total_tokens": 22}
}"#;

#[tokio::test]
async fn test_chat_request_goes_to_chat_completions() {
    let sender = CannedSender::new(200, CHAT_REPLY);
    let client = OpenAI::builder()
        .api_key("sk-test")
        .sender(sender.clone())
        .build();

    let request = ChatRequest::builder()
        .model("gpt-4o")
        .messages(vec![Message::user("Capital of France?")])
        .build();
    let response = client.send(&request).await.expect("send should succeed");

    assert_eq!(response.content(), Some("Paris."));
    assert_eq!(response.usage.unwrap().completion_tokens(), 2);

    let seen = sender.seen.lock().unwrap();
    assert_eq!(seen[0].url, "https://api.openai.com/v1/chat/completions");
    assert_eq!(seen[0].headers["authorization"], "Bearer sk-test");
}

#[tokio::test]
async fn test_responses_request_goes_to_responses() {
    let sender = CannedSender::new(
        200,
        r#"{
            "id": "resp_1",
            "model": "o4-mini",
            "output": [{"type": "function_call", "id": "fc_1", "call_id": "call_1",
                        "name": "scrape", "arguments": "{\"url\":\"www.google.com\"}"}],
            "usage": {"input_tokens": 3, "output_tokens": 4, "total_tokens": 7}
        }"#,
    );
    let client = OpenAI::builder()
        .api_key("sk-test")
        .base_url("http://localhost:8080/v1/")
        .sender(sender.clone())
        .build();

    let request = ResponsesRequest::builder()
        .model("o4-mini")
        .input(vec![InputItem::message(
            InputRole::User,
            vec![InputContent::InputText {
                text: "scrape google".into(),
            }],
        )])
        .build();
    let response = client
        .send_responses(&request)
        .await
        .expect("send should succeed");

    let items = response.items();
    assert!(matches!(
        items[0],
        Ok(OutputItem::FunctionCall { ref call_id, .. }) if call_id == "call_1"
    ));
    assert_eq!(
        sender.seen.lock().unwrap()[0].url,
        "http://localhost:8080/v1/responses"
    );
}

#[tokio::test]
async fn test_error_reply_is_typed() {
    let sender = CannedSender::new(
        401,
        r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#,
    );
    let client = OpenAI::builder().api_key("bad").sender(sender).build();

    let request = ChatRequest::builder()
        .model("gpt-4o")
        .messages(vec![Message::user("hi")])
        .build();
    let err = client.send(&request).await.unwrap_err();

    assert!(matches!(err, OpenAIRequestError::Authentication(ref m) if m == "Incorrect API key provided"));
}
