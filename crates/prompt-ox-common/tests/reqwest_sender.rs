use std::{collections::HashMap, time::Duration};

use prompt_ox_common::{
    Bytes, CommonRequestError, HttpMethod, OutboundRequest, ReqwestSender, RequestSender,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn post(url: String, body: &'static str) -> OutboundRequest {
    let mut headers = HashMap::new();
    headers.insert("content-type".to_string(), "application/json".to_string());
    headers.insert("x-api-key".to_string(), "secret".to_string());
    OutboundRequest {
        method: HttpMethod::Post,
        url,
        headers,
        body: Bytes::from_static(body.as_bytes()),
    }
}

#[tokio::test]
async fn test_success_returns_body_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "secret"))
        .and(body_json(serde_json::json!({"hello": "world"})))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let sender = ReqwestSender::new(Duration::from_secs(5));
    let bytes = sender
        .send(post(format!("{}/v1/messages", server.uri()), r#"{"hello":"world"}"#))
        .await
        .expect("request should succeed");

    assert_eq!(bytes.as_ref(), br#"{"ok":true}"#);
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string(
            r#"{"error":{"type":"rate_limit_error","message":"slow down"}}"#,
        ))
        .mount(&server)
        .await;

    let sender = ReqwestSender::new(Duration::from_secs(5));
    let err = sender
        .send(post(format!("{}/v1/messages", server.uri()), "{}"))
        .await
        .unwrap_err();

    match err {
        CommonRequestError::Status { status, kind, message } => {
            assert_eq!(kind.as_deref(), Some("rate_limit_error"));
            assert_eq!(status, 429);
            assert_eq!(message, "slow down");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_reply_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let sender = ReqwestSender::new(Duration::from_millis(50));
    assert_eq!(sender.timeout(), Duration::from_millis(50));

    let err = sender
        .send(post(format!("{}/slow", server.uri()), "{}"))
        .await
        .unwrap_err();
    assert!(matches!(err, CommonRequestError::Timeout(t) if t == Duration::from_millis(50)));
}
