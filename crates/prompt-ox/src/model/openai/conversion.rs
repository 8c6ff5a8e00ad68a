use openai_ox::{
    ChatResponse, ContentPart, JsonSchemaFormat, Message as ChatMessage, MessageContent,
    ResponseFormat as ChatResponseFormat,
    responses::{
        InputContent, InputItem, InputRole, OutputContent, OutputItem, ReasoningConfig,
        ReasoningEffort, ResponsesResponse, ResponsesTool, SummaryPart, TextConfig, TextFormat,
    },
};
use serde_json::Value;

use crate::{
    content::Content,
    errors::LlmError,
    format::ResponseFormat,
    message::Message,
    model::{
        ThinkingLevel, ToolArgumentPolicy,
        segments::{
            OutputSegments, apply_tool_policy, encode_tool_output, encode_tool_request, text_only,
        },
    },
    output::LlmOutput,
    tool::{ToolCallResponse, ToolDefinition},
    usage::Usage,
};

use super::error::OpenAiError;

/// Chat Completions messages. The prefix becomes a leading system message;
/// tool and thinking turns have no standard-mode representation.
pub fn chat_messages(
    prefix: Option<&str>,
    messages: &[Message],
) -> Result<Vec<ChatMessage>, LlmError> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    if let Some(prefix) = prefix {
        out.push(ChatMessage::system(prefix));
    }
    for message in messages {
        match message {
            Message::System(content) => out.push(ChatMessage::system(text_only(content)?)),
            Message::User(content) => out.push(ChatMessage::user(chat_content(content)?)),
            Message::Ai(content) => out.push(ChatMessage::assistant(text_only(content)?)),
            Message::Tool(exchange) => {
                log::debug!(
                    "standard mode omits tool exchange {}",
                    exchange.call_id()
                );
            }
            Message::Thinking(_) => log::debug!("standard mode omits thinking turns"),
        }
    }
    Ok(out)
}

fn chat_content(content: &Content) -> Result<MessageContent, LlmError> {
    match content {
        Content::Text(text) => Ok(MessageContent::Text(text.clone())),
        Content::Object(_) => Ok(MessageContent::Text(content.text_representation())),
        Content::ImageUrl(url) => Ok(vec![ContentPart::image_url(url)].into()),
        Content::Image { .. } => {
            let url = content
                .data_url()
                .ok_or_else(|| LlmError::unsupported_media_type(content.kind()))?;
            Ok(vec![ContentPart::image_url(url)].into())
        }
        Content::FileId(_) => Err(LlmError::unsupported_media_type(content.kind())),
    }
}

pub fn chat_response_format(format: &ResponseFormat) -> Option<ChatResponseFormat> {
    match format {
        ResponseFormat::Text => None,
        ResponseFormat::JsonObject => Some(ChatResponseFormat::JsonObject),
        ResponseFormat::JsonSchema { schema, name } => Some(ChatResponseFormat::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: name.clone(),
                schema: schema.clone(),
                strict: None,
            },
        }),
    }
}

pub fn chat_output(response: ChatResponse, strict: bool) -> Result<Option<LlmOutput>, LlmError> {
    let usage = response.usage.as_ref().map_or(Usage::NONE, |u| {
        Usage::new(u.prompt_tokens, u.completion_tokens(), u.total_tokens)
    });
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(OpenAiError::NoChoices)?;

    let mut segments = OutputSegments::new(strict);
    if let Some(text) = choice.message.text() {
        segments.push_text(text);
    } else if let Some(refusal) = choice.message.refusal {
        segments.push_text(refusal);
    }
    for call in choice.message.tool_calls.unwrap_or_default() {
        segments.push_tool_call(
            call.id.clone(),
            call.id,
            call.function.name,
            &Value::String(call.function.arguments),
        )?;
    }

    if segments.is_empty() {
        return Ok(None);
    }
    Ok(Some(segments.into_output(usage)))
}

/// Responses API input items, one or more per message, in message order.
pub fn responses_input(
    messages: &[Message],
    policy: ToolArgumentPolicy,
) -> Result<Vec<InputItem>, LlmError> {
    let mut items = Vec::with_capacity(messages.len());
    for message in messages {
        match message {
            Message::System(content) => items.push(InputItem::message(
                InputRole::System,
                vec![input_content(content)?],
            )),
            Message::User(content) => items.push(InputItem::message(
                InputRole::User,
                vec![input_content(content)?],
            )),
            Message::Ai(content) => items.push(InputItem::message(
                InputRole::Assistant,
                vec![InputContent::OutputText {
                    text: text_only(content)?,
                }],
            )),
            Message::Tool(exchange) => {
                let request = exchange.request();
                let Some(arguments) =
                    apply_tool_policy(policy, exchange, encode_tool_request(request))?
                else {
                    continue;
                };
                items.push(InputItem::FunctionCall {
                    id: None,
                    call_id: exchange.call_id().to_string(),
                    name: request.tool_name.clone(),
                    arguments,
                });
                if let Some(response) = exchange.response() {
                    items.push(InputItem::FunctionCallOutput {
                        call_id: exchange.call_id().to_string(),
                        output: encode_tool_output(response),
                    });
                }
            }
            Message::Thinking(item) => {
                let Some(id) = item.id.as_ref().filter(|_| !item.is_empty()) else {
                    log::debug!("dropping reasoning turn without id or content");
                    continue;
                };
                items.push(InputItem::Reasoning {
                    id: id.clone(),
                    summary: item
                        .reasoning
                        .iter()
                        .map(|text| SummaryPart::SummaryText { text: text.clone() })
                        .collect(),
                });
            }
        }
    }
    Ok(items)
}

fn input_content(content: &Content) -> Result<InputContent, LlmError> {
    Ok(match content {
        Content::Text(text) => InputContent::InputText { text: text.clone() },
        Content::FileId(file_id) => InputContent::InputFile {
            file_id: file_id.clone(),
        },
        Content::Image { .. } => InputContent::InputImage {
            image_url: content
                .data_url()
                .ok_or_else(|| LlmError::unsupported_media_type(content.kind()))?,
            detail: None,
        },
        Content::ImageUrl(url) => InputContent::InputImage {
            image_url: url.clone(),
            detail: None,
        },
        Content::Object(_) => InputContent::InputText {
            text: content.text_representation(),
        },
    })
}

pub fn text_config(format: &ResponseFormat) -> Option<TextConfig> {
    let format = match format {
        ResponseFormat::Text => return None,
        ResponseFormat::JsonObject => TextFormat::JsonObject,
        ResponseFormat::JsonSchema { schema, name } => TextFormat::JsonSchema {
            name: name.clone(),
            schema: schema.clone(),
            strict: None,
        },
    };
    Some(TextConfig { format })
}

pub fn reasoning_config(level: ThinkingLevel) -> ReasoningConfig {
    let effort = match level {
        ThinkingLevel::Low => ReasoningEffort::Low,
        ThinkingLevel::Medium => ReasoningEffort::Medium,
        ThinkingLevel::High => ReasoningEffort::High,
    };
    ReasoningConfig {
        effort: Some(effort),
        summary: Some("auto".to_string()),
    }
}

pub fn responses_tools(tools: &[ToolDefinition]) -> Option<Vec<ResponsesTool>> {
    (!tools.is_empty()).then(|| {
        tools
            .iter()
            .map(|t| ResponsesTool::function(&t.name, t.description.clone(), t.parameters.clone()))
            .collect()
    })
}

pub fn responses_output(
    response: &ResponsesResponse,
    strict: bool,
) -> Result<Option<LlmOutput>, LlmError> {
    let usage = response.usage.as_ref().map_or(Usage::NONE, |u| {
        Usage::new(u.input_tokens, u.output_tokens.unwrap_or(0), u.total_tokens)
    });

    let mut segments = OutputSegments::new(strict);
    for item in response.items() {
        match item {
            Ok(OutputItem::Message { content, .. }) => {
                for part in content {
                    match part {
                        OutputContent::OutputText { text } => segments.push_text(text),
                        OutputContent::Refusal { refusal } => segments.push_text(refusal),
                        OutputContent::Other => {}
                    }
                }
            }
            Ok(OutputItem::FunctionCall {
                id,
                call_id,
                name,
                arguments,
            }) => {
                let id = id.unwrap_or_else(|| call_id.clone());
                segments.push_tool_call(id, call_id, name, &Value::String(arguments))?;
            }
            Ok(OutputItem::FunctionCallOutput {
                id,
                call_id,
                output,
            }) => {
                let output = match output {
                    Value::String(encoded) => {
                        serde_json::from_str(&encoded).unwrap_or(Value::String(encoded))
                    }
                    other => other,
                };
                segments.push_tool_response(ToolCallResponse::new(
                    id.unwrap_or_default(),
                    call_id,
                    String::new(),
                    output,
                ));
            }
            Ok(OutputItem::Reasoning { id, summary }) => segments.push_reasoning(
                Some(id),
                summary.into_iter().map(|SummaryPart::SummaryText { text }| text),
            ),
            Ok(OutputItem::Other) => {}
            Err(malformed) => match malformed.kind.as_str() {
                "function_call" => {
                    segments.reject_tool_call(format!("{}: {}", malformed.raw, malformed.error))?;
                }
                "reasoning" => {
                    segments.reject_reasoning(format!("{}: {}", malformed.raw, malformed.error))?;
                }
                kind => log::warn!("skipping malformed `{kind}` output item: {}", malformed.error),
            },
        }
    }

    if segments.is_empty() {
        return Ok(None);
    }
    Ok(Some(segments.into_output(usage)))
}
