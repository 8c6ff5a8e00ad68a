use anthropic_ox::{
    message::{Content, Role, StringOrContents},
    request::ChatRequest,
    tool::{ToolResult, ToolResultContent},
};

#[test]
fn test_chat_request_with_string_content() {
    let json = r#"{
        "model": "claude-3-5-sonnet-20241022",
        "max_tokens": 4096,
        "messages": [
            {
                "role": "user",
                "content": "Hello world"
            }
        ]
    }"#;

    let request: ChatRequest = serde_json::from_str(json).expect("Failed to deserialize");
    assert_eq!(request.model, "claude-3-5-sonnet-20241022");
    assert_eq!(request.max_tokens, 4096);
    assert_eq!(request.messages.len(), 1);

    let message = &request.messages[0];
    assert_eq!(message.role, Role::User);
    match &message.content {
        StringOrContents::String(s) => assert_eq!(s, "Hello world"),
        StringOrContents::Contents(_) => panic!("Expected String variant"),
    }
}

#[test]
fn test_chat_request_multiple_messages_mixed_content() {
    let json = r#"{
        "model": "claude-3-5-sonnet-20241022",
        "max_tokens": 4096,
        "system": "Be brief.",
        "messages": [
            {"role": "user", "content": "Simple string message"},
            {"role": "assistant", "content": [{"type": "text", "text": "Array response"}]},
            {"role": "user", "content": [
                {"type": "text", "text": "First part"},
                {"type": "text", "text": "Second part"}
            ]}
        ]
    }"#;

    let request: ChatRequest = serde_json::from_str(json).expect("Failed to deserialize");
    assert_eq!(request.messages.len(), 3);
    assert_eq!(request.system, Some(StringOrContents::String("Be brief.".to_string())));

    let msg2 = &request.messages[1];
    assert_eq!(msg2.role, Role::Assistant);
    match &msg2.content {
        StringOrContents::Contents(contents) => {
            assert_eq!(contents.len(), 1);
            assert_eq!(contents[0], Content::text("Array response"));
        }
        StringOrContents::String(_) => panic!("Expected Contents variant for message 2"),
    }

    match &request.messages[2].content {
        StringOrContents::Contents(contents) => assert_eq!(contents.len(), 2),
        StringOrContents::String(_) => panic!("Expected Contents variant for message 3"),
    }
}

#[test]
fn test_tool_result_deserialize_string_content() {
    let json_str = r#"{
        "tool_use_id": "toolu_01A09q90qw90lkasdjl",
        "content": "Cargo.lock\nCargo.toml\nsrc/"
    }"#;

    let result: ToolResult = serde_json::from_str(json_str).expect("Failed to deserialize");

    assert_eq!(result.tool_use_id, "toolu_01A09q90qw90lkasdjl");
    assert_eq!(result.content.len(), 1);
    match &result.content[0] {
        ToolResultContent::Text { text } => assert_eq!(text, "Cargo.lock\nCargo.toml\nsrc/"),
        ToolResultContent::Image { .. } => panic!("Expected Text content"),
    }
}

#[test]
fn test_tool_result_deserialize_array_content_with_is_error() {
    let json_str = r#"{
        "tool_use_id": "toolu_01A09q90qw90lkasdjl",
        "content": [{"type": "text", "text": "Error: File not found"}],
        "is_error": true,
        "cache_control": {"type": "ephemeral"}
    }"#;

    let result: ToolResult = serde_json::from_str(json_str).expect("Failed to deserialize");

    assert_eq!(result.is_error, Some(true));
    assert_eq!(result.text_content(), "Error: File not found");
}

#[test]
fn test_tool_result_serializes_as_block() {
    let content = Content::from(ToolResult::text("toolu_1", "\"scraped\""));
    let json = serde_json::to_value(&content).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "tool_result",
            "tool_use_id": "toolu_1",
            "content": [{"type": "text", "text": "\"scraped\""}]
        })
    );
}
