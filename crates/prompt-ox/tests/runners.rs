mod common;

use common::ScriptedLlm;
use prompt_ox::{
    ApiType, BasicPromptRunner, JsonSchemaPromptRunner, LlmOutput, Message, PromptRunner,
    PromptTemplate, ReasoningItem, ResponseFormat, RunnerError, ToolCallRequest,
    ToolCapablePromptRunner, Usage,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Map;

fn reply_with_extras(text: &str) -> LlmOutput {
    LlmOutput {
        tool_calls: Some(vec![ToolCallRequest::new("fc_1", "call_1", "weather", Map::new())]),
        reasoning: Some(ReasoningItem::new(Some("rs_1".into()), vec!["thought".into()])),
        ..LlmOutput::from_text(text, Usage::from_counts(10, 5))
    }
}

#[tokio::test]
async fn test_basic_runner_drops_tool_calls_and_reasoning() {
    let llm = ScriptedLlm::new(Some(reply_with_extras("Paris.")));
    let output = BasicPromptRunner::default()
        .run(vec![Message::user("Capital?")], &llm)
        .await
        .unwrap();

    assert_eq!(output.output, "Paris.");
    assert_eq!(output.raw_text, "Paris.");
    assert!(output.tool_calls.is_none());
    assert!(output.reasoning.is_none());
    assert!(output.run_time.is_some());

    let calls = llm.calls();
    assert_eq!(calls[0].1, ResponseFormat::Text);
    assert_eq!(calls[0].2, ApiType::Standard);
}

#[tokio::test]
async fn test_basic_runner_tolerates_absent_result() {
    let llm = ScriptedLlm::new(None);
    let output = BasicPromptRunner::new(ApiType::Advanced)
        .run(vec![Message::user("Capital?")], &llm)
        .await
        .unwrap();
    assert_eq!(output.raw_text, "");
    assert!(output.usage.is_none());
    assert_eq!(llm.calls()[0].2, ApiType::Advanced);
}

#[tokio::test]
async fn test_tool_runner_forces_advanced_and_keeps_extras() {
    let llm = ScriptedLlm::new(Some(reply_with_extras("Checking.")));
    let output = ToolCapablePromptRunner::new()
        .run(vec![Message::user("Weather?")], &llm)
        .await
        .unwrap();

    assert!(output.has_tool_calls());
    assert_eq!(output.reasoning.unwrap().id.as_deref(), Some("rs_1"));
    assert_eq!(llm.calls()[0].2, ApiType::Advanced);
}

#[tokio::test]
async fn test_templates_render_to_one_user_message() {
    let llm = ScriptedLlm::new(Some(LlmOutput::from_text("Lima.", Usage::NONE)));
    let template = PromptTemplate::new("capital", "What is the capital of {country}?")
        .slot("country", "Peru");

    BasicPromptRunner::default()
        .run_template(&template, &llm)
        .await
        .unwrap();

    let calls = llm.calls();
    assert_eq!(calls[0].0, vec![Message::user("What is the capital of Peru?")]);
}

#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
struct Capital {
    city: String,
    population: u64,
}

#[tokio::test]
async fn test_schema_runner_decodes_the_reply() {
    let llm = ScriptedLlm::new(Some(LlmOutput::from_text(
        r#"{"city": "Paris", "population": 2100000}"#,
        Usage::from_counts(12, 9),
    )));
    let output = JsonSchemaPromptRunner::<Capital>::default()
        .run(vec![Message::user("Capital of France?")], &llm)
        .await
        .unwrap();

    assert_eq!(
        output.output,
        Capital {
            city: "Paris".into(),
            population: 2_100_000
        }
    );
    assert_eq!(output.usage.total_tokens, 21);

    let calls = llm.calls();
    match &calls[0].1 {
        ResponseFormat::JsonSchema { schema, name } => {
            assert_eq!(name, "Capital");
            assert_eq!(schema["type"], "object");
            assert!(schema.get("title").is_none());
        }
        other => panic!("expected a JSON schema format, got {other:?}"),
    }
}

#[tokio::test]
async fn test_schema_runner_rejects_empty_output() {
    let llm = ScriptedLlm::new(Some(LlmOutput::from_text("  ", Usage::NONE)));
    let err = JsonSchemaPromptRunner::<Capital>::default()
        .run(vec![Message::user("Capital?")], &llm)
        .await
        .unwrap_err();
    assert!(matches!(err, RunnerError::EmptyOutput { ref type_name } if type_name == "Capital"));

    let llm = ScriptedLlm::new(None);
    let err = JsonSchemaPromptRunner::<Capital>::default()
        .run(vec![Message::user("Capital?")], &llm)
        .await
        .unwrap_err();
    assert!(matches!(err, RunnerError::EmptyOutput { .. }));
}

#[tokio::test]
async fn test_schema_runner_rejects_invalid_json() {
    let llm = ScriptedLlm::new(Some(LlmOutput::from_text("Paris", Usage::NONE)));
    let err = JsonSchemaPromptRunner::<Capital>::default()
        .run(vec![Message::user("Capital?")], &llm)
        .await
        .unwrap_err();
    match err {
        RunnerError::Decode {
            type_name,
            raw_text,
            ..
        } => {
            assert_eq!(type_name, "Capital");
            assert_eq!(raw_text, "Paris");
        }
        other => panic!("expected a decode error, got {other:?}"),
    }
}
