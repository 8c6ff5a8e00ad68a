//! Provider-independent halves of the adapters.
//!
//! Inbound, every adapter sorts the provider's output items into an
//! [`OutputSegments`] and turns that into an [`LlmOutput`]. Outbound, the
//! helpers here check tool requests against the constraints every supported
//! provider puts on function calls and apply the caller's
//! [`ToolArgumentPolicy`].

use serde_json::{Map, Value};

use crate::{
    content::Content,
    errors::LlmError,
    message::{Message, ReasoningItem},
    model::ToolArgumentPolicy,
    output::LlmOutput,
    tool::{ToolCallExchange, ToolCallRequest, ToolCallResponse, ToolDefinition},
    usage::Usage,
};

/// Inbound output items sorted by kind, in provider order.
#[derive(Debug, Default)]
pub struct OutputSegments {
    pub texts: Vec<String>,
    pub tool_calls: Vec<ToolCallRequest>,
    pub tool_responses: Vec<ToolCallResponse>,
    pub reasoning: Option<ReasoningItem>,
    strict: bool,
}

impl OutputSegments {
    /// With `strict` set, malformed tool calls and reasoning items fail the
    /// call instead of being dropped.
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.texts.push(text.into());
    }

    /// Adds a tool call, decoding `arguments` from a JSON string or object.
    ///
    /// # Errors
    ///
    /// In strict mode, fails with [`LlmError::NotAValidToolCall`] when the
    /// arguments do not decode to a JSON object.
    pub fn push_tool_call(
        &mut self,
        id: impl Into<String>,
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: &Value,
    ) -> Result<(), LlmError> {
        let tool_name = tool_name.into();
        match decode_arguments(arguments) {
            Ok(arguments) => {
                self.tool_calls
                    .push(ToolCallRequest::new(id, call_id, tool_name, arguments));
                Ok(())
            }
            Err(reason) => self.reject_tool_call(format!("{tool_name}: {reason}")),
        }
    }

    pub fn push_tool_response(&mut self, response: ToolCallResponse) {
        log::debug!(
            "provider echoed result for tool call {}; not part of the envelope",
            response.call_id
        );
        self.tool_responses.push(response);
    }

    /// Appends reasoning chunks. All chunks of one reply form one item; the
    /// first id seen wins.
    pub fn push_reasoning(&mut self, id: Option<String>, chunks: impl IntoIterator<Item = String>) {
        let item = self.reasoning.get_or_insert_with(ReasoningItem::default);
        if item.id.is_none() {
            item.id = id;
        }
        item.reasoning.extend(chunks);
    }

    /// Records a tool call item that could not be decoded.
    ///
    /// # Errors
    ///
    /// Fails with [`LlmError::NotAValidToolCall`] in strict mode.
    pub fn reject_tool_call(&mut self, description: impl Into<String>) -> Result<(), LlmError> {
        let description = description.into();
        if self.strict {
            return Err(LlmError::NotAValidToolCall(description));
        }
        log::warn!("dropping malformed tool call: {description}");
        Ok(())
    }

    /// Records a reasoning item that could not be decoded.
    ///
    /// # Errors
    ///
    /// Fails with [`LlmError::NotAValidReasoningItem`] in strict mode.
    pub fn reject_reasoning(&mut self, description: impl Into<String>) -> Result<(), LlmError> {
        let description = description.into();
        if self.strict {
            return Err(LlmError::NotAValidReasoningItem(description));
        }
        log::warn!("dropping malformed reasoning item: {description}");
        Ok(())
    }

    /// True when the provider produced nothing the envelope can carry.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.tool_calls.is_empty() && self.reasoning.is_none()
    }

    pub fn into_output(self, usage: Usage) -> LlmOutput {
        let raw_text = self.texts.join("\n");
        LlmOutput {
            output: raw_text.clone(),
            raw_text,
            usage,
            tool_calls: (!self.tool_calls.is_empty()).then_some(self.tool_calls),
            reasoning: self.reasoning,
            run_time: None,
        }
    }
}

/// Decodes a provider argument payload into a JSON object.
///
/// OpenAI sends a JSON-encoded string, Anthropic a JSON value.
pub fn decode_arguments(payload: &Value) -> Result<Map<String, Value>, String> {
    let value = match payload {
        Value::String(encoded) => {
            serde_json::from_str::<Value>(encoded).map_err(|e| format!("invalid JSON: {e}"))?
        }
        other => other.clone(),
    };
    match value {
        Value::Object(map) => Ok(map),
        other => Err(format!("expected a JSON object, got {other}")),
    }
}

/// Tool names the providers accept: 1 to 64 ASCII letters, digits, `_` or `-`.
fn is_valid_tool_name(name: &str) -> bool {
    (1..=64).contains(&name.len())
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Rejects tool definitions whose names no provider accepts.
///
/// # Errors
///
/// Fails with [`LlmError::Configuration`] naming the first bad tool.
pub fn check_tool_definitions(tools: &[ToolDefinition]) -> Result<(), LlmError> {
    match tools.iter().find(|tool| !is_valid_tool_name(&tool.name)) {
        Some(tool) => Err(LlmError::configuration(format!(
            "invalid tool name `{}`: use 1-64 characters of [a-zA-Z0-9_-]",
            tool.name
        ))),
        None => Ok(()),
    }
}

/// Checks that a tool request can be sent back to a provider and returns
/// its arguments as a JSON string.
///
/// # Errors
///
/// Fails with [`LlmError::ToolArgumentEncoding`] for tool names the
/// providers reject and for arguments that do not serialize.
pub fn encode_tool_request(request: &ToolCallRequest) -> Result<String, LlmError> {
    if !is_valid_tool_name(&request.tool_name) {
        return Err(LlmError::tool_argument_encoding(
            &request.tool_name,
            "tool names must be 1-64 characters of [a-zA-Z0-9_-]",
        ));
    }
    serde_json::to_string(&request.arguments)
        .map_err(|e| LlmError::tool_argument_encoding(&request.tool_name, e.to_string()))
}

/// Text sent back to the provider for a finished tool run.
///
/// Failed runs carry both the error and whatever output the tool produced.
pub fn encode_tool_output(response: &ToolCallResponse) -> String {
    match &response.error_message {
        Some(error) => serde_json::json!({ "error": error, "output": response.output }).to_string(),
        None => response.output.to_string(),
    }
}

/// Applies `policy` to a tool exchange whose request failed to encode.
///
/// Returns `Ok(None)` when the exchange should be left out of the request.
///
/// # Errors
///
/// Passes the encoding error through under [`ToolArgumentPolicy::Fail`].
pub fn apply_tool_policy<T>(
    policy: ToolArgumentPolicy,
    exchange: &ToolCallExchange,
    encoded: Result<T, LlmError>,
) -> Result<Option<T>, LlmError> {
    match (encoded, policy) {
        (Ok(value), _) => Ok(Some(value)),
        (Err(error), ToolArgumentPolicy::Fail) => Err(error),
        (Err(error), ToolArgumentPolicy::Skip) => {
            log::warn!(
                "skipping tool exchange {} for `{}`: {error}",
                exchange.call_id(),
                exchange.request().tool_name
            );
            Ok(None)
        }
    }
}

/// System prompt for providers with a top-level system field: the prefix and
/// the first system message, separated by a blank line. Later system
/// messages are ignored with a warning.
///
/// # Errors
///
/// Fails with [`LlmError::UnsupportedMediaType`] when the first system
/// message is not text.
pub fn system_prompt(
    prefix: Option<&str>,
    messages: &[Message],
) -> Result<Option<String>, LlmError> {
    let mut systems = messages.iter().filter_map(|m| match m {
        Message::System(content) => Some(content),
        _ => None,
    });

    let first = systems.next().map(text_only).transpose()?;
    let ignored = systems.count();
    if ignored > 0 {
        log::warn!("only the first system message is used; ignoring {ignored} more");
    }

    let parts: Vec<&str> = prefix
        .into_iter()
        .chain(first.as_deref())
        .filter(|part| !part.is_empty())
        .collect();
    Ok((!parts.is_empty()).then(|| parts.join("\n\n")))
}

/// Text of content that must be textual on the wire. Objects become pretty JSON.
///
/// # Errors
///
/// Fails with [`LlmError::UnsupportedMediaType`] for files and images.
pub fn text_only(content: &Content) -> Result<String, LlmError> {
    match content {
        Content::Text(text) => Ok(text.clone()),
        Content::Object(_) => Ok(content.text_representation()),
        other => Err(LlmError::unsupported_media_type(other.kind())),
    }
}
