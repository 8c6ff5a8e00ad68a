use anthropic_ox::{
    ChatResponse,
    message::{
        Content as AnthropicContent, Image, ImageSource, Message as AnthropicMessage, Role,
        StringOrContents, ThinkingContent,
    },
    tool::{Tool, ToolChoice, ToolResult, ToolUse},
};
use serde_json::Value;

use crate::{
    content::{Content, pretty_json},
    errors::LlmError,
    format::{ApiType, ResponseFormat},
    message::Message,
    model::{
        ThinkingLevel, ToolArgumentPolicy,
        segments::{OutputSegments, apply_tool_policy, encode_tool_output, encode_tool_request},
    },
    output::LlmOutput,
    tool::{ToolCallResponse, ToolDefinition},
    usage::Usage,
};

/// Name of the forced tool that carries schema-constrained output.
pub const JSON_TOOL_NAME: &str = "json_data";

/// Token budget per thinking level.
pub fn thinking_budget(level: ThinkingLevel) -> u32 {
    match level {
        ThinkingLevel::Low => 1024,
        ThinkingLevel::Medium => 4096,
        ThinkingLevel::High => 16384,
    }
}

/// Conversation turns as Messages API entries. System messages are not
/// included; they travel in the top-level `system` field.
///
/// Consecutive blocks of the same role share one message, so a thinking
/// block and the tool call that follows it land in one assistant turn.
pub fn messages(
    messages: &[Message],
    api_type: ApiType,
    policy: ToolArgumentPolicy,
) -> Result<Vec<AnthropicMessage>, LlmError> {
    let mut out: Vec<AnthropicMessage> = Vec::with_capacity(messages.len());
    let mut push = |role: Role, block: AnthropicContent| match out.last_mut() {
        Some(last) if last.role == role => {
            if let StringOrContents::Contents(blocks) = &mut last.content {
                blocks.push(block);
            }
        }
        _ => out.push(AnthropicMessage::new(role, vec![block])),
    };

    for message in messages {
        match message {
            Message::System(_) => {}
            Message::User(content) => push(Role::User, content_block(content)?),
            Message::Ai(content) => push(Role::Assistant, content_block(content)?),
            Message::Tool(exchange) if api_type == ApiType::Advanced => {
                let request = exchange.request();
                if apply_tool_policy(policy, exchange, encode_tool_request(request))?.is_none() {
                    continue;
                }
                push(
                    Role::Assistant,
                    AnthropicContent::ToolUse(ToolUse::new(
                        exchange.call_id(),
                        &request.tool_name,
                        Value::Object(request.arguments.clone()),
                    )),
                );
                if let Some(response) = exchange.response() {
                    let mut result = ToolResult::text(exchange.call_id(), encode_tool_output(response));
                    if response.is_error() {
                        result.is_error = Some(true);
                    }
                    push(Role::User, AnthropicContent::ToolResult(result));
                }
            }
            Message::Thinking(item) if api_type == ApiType::Advanced => {
                if item.is_empty() {
                    log::debug!("dropping empty thinking turn");
                    continue;
                }
                let Some(signature) = item.id.clone().filter(|id| !id.is_empty()) else {
                    log::debug!("dropping unsigned thinking turn");
                    continue;
                };
                push(
                    Role::Assistant,
                    AnthropicContent::Thinking(ThinkingContent {
                        thinking: item.text(),
                        signature,
                    }),
                );
            }
            Message::Tool(_) | Message::Thinking(_) => {
                log::debug!("standard mode omits {} turns", message.author());
            }
        }
    }
    Ok(out)
}

fn content_block(content: &Content) -> Result<AnthropicContent, LlmError> {
    Ok(match content {
        Content::Text(text) => AnthropicContent::text(text.clone()),
        Content::Object(value) => AnthropicContent::text(pretty_json(value)),
        Content::Image { data, .. } => {
            let media_type = content
                .media_type()
                .ok_or_else(|| LlmError::unsupported_media_type(content.kind()))?;
            AnthropicContent::Image(Image {
                source: ImageSource::from_bytes(media_type, data),
            })
        }
        Content::ImageUrl(url) => AnthropicContent::Image(Image {
            source: ImageSource::Url { url: url.clone() },
        }),
        Content::FileId(_) => return Err(LlmError::unsupported_media_type(content.kind())),
    })
}

/// Caller-defined tools plus, for schema-constrained output, the
/// [`JSON_TOOL_NAME`] tool. That tool is forced unless extended thinking is
/// on, which only accepts `auto` tool choice.
pub fn tools(
    definitions: &[ToolDefinition],
    api_type: ApiType,
    response_format: &ResponseFormat,
    thinking: bool,
) -> (Option<Vec<Tool>>, Option<ToolChoice>) {
    let mut tools: Vec<Tool> = if api_type == ApiType::Advanced {
        definitions
            .iter()
            .map(|d| {
                let tool = Tool::new(&d.name, d.parameters.clone());
                match &d.description {
                    Some(description) => tool.with_description(description),
                    None => tool,
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    let choice = match response_format {
        ResponseFormat::JsonSchema { schema, name } => {
            tools.push(
                Tool::new(JSON_TOOL_NAME, schema.clone())
                    .with_description(format!("Respond with a {name} object")),
            );
            Some(if thinking {
                ToolChoice::Auto
            } else {
                ToolChoice::Tool {
                    name: JSON_TOOL_NAME.to_string(),
                }
            })
        }
        ResponseFormat::JsonObject => {
            log::debug!("anthropic has no JSON mode; relying on the prompt");
            None
        }
        ResponseFormat::Text => None,
    };

    ((!tools.is_empty()).then_some(tools), choice)
}

pub fn output(
    response: ChatResponse,
    response_format: &ResponseFormat,
    strict: bool,
) -> Result<Option<LlmOutput>, LlmError> {
    let usage = Usage::from_counts(
        u64::from(response.usage.prompt_tokens()),
        u64::from(response.usage.completion_tokens()),
    );
    let structured = matches!(response_format, ResponseFormat::JsonSchema { .. });

    let mut segments = OutputSegments::new(strict);
    for block in response.blocks() {
        let block = match block {
            Ok(block) => block,
            Err(malformed) => {
                let description = format!("{}: {}", malformed.raw, malformed.error);
                match malformed.kind.as_str() {
                    "tool_use" => segments.reject_tool_call(description)?,
                    "thinking" => segments.reject_reasoning(description)?,
                    kind => log::warn!("skipping malformed `{kind}` content block: {}", malformed.error),
                }
                continue;
            }
        };
        match block {
            AnthropicContent::Text(text) => segments.push_text(text.text),
            AnthropicContent::ToolUse(tool_use) if structured && tool_use.name == JSON_TOOL_NAME => {
                segments.push_text(pretty_json(&tool_use.input));
            }
            AnthropicContent::ToolUse(ToolUse { id, name, input }) => {
                segments.push_tool_call(id.clone(), id, name, &input)?;
            }
            AnthropicContent::ToolResult(result) => {
                let text = result.text_content();
                let output = serde_json::from_str(&text).unwrap_or(Value::String(text));
                let mut response = ToolCallResponse::new(
                    result.tool_use_id.clone(),
                    result.tool_use_id,
                    String::new(),
                    output,
                );
                if result.is_error == Some(true) {
                    response = response.with_error("tool reported an error");
                }
                segments.push_tool_response(response);
            }
            AnthropicContent::Thinking(ThinkingContent {
                thinking,
                signature,
            }) => {
                segments.push_reasoning((!signature.is_empty()).then_some(signature), [thinking]);
            }
            AnthropicContent::RedactedThinking(_)
            | AnthropicContent::Image(_)
            | AnthropicContent::Unknown => {}
        }
    }

    if segments.is_empty() {
        return Ok(None);
    }
    Ok(Some(segments.into_output(usage)))
}
