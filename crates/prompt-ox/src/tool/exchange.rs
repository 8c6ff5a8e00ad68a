use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ToolExchangeError;

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned item id. Not unique across providers.
    pub id: String,
    /// Correlation key shared with the matching [`ToolCallResponse`].
    pub call_id: String,
    pub tool_name: String,
    pub arguments: Map<String, Value>,
}

impl ToolCallRequest {
    pub fn new(
        id: impl Into<String>,
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

impl fmt::Display for ToolCallRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Called Tool: {} with {}",
            self.tool_name,
            Value::Object(self.arguments.clone())
        )
    }
}

/// The result of running a tool. A set `error_message` marks the run as
/// failed; `output` may still hold partial output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResponse {
    pub id: String,
    pub call_id: String,
    pub tool_name: String,
    pub output: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ToolCallResponse {
    pub fn new(
        id: impl Into<String>,
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: Value,
    ) -> Self {
        Self {
            id: id.into(),
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            output,
            error_message: None,
        }
    }

    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }
}

impl fmt::Display for ToolCallResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_message {
            Some(error) => write!(f, "Tool {} failed: {error}", self.tool_name),
            None => write!(f, "Tool {} returned {}", self.tool_name, self.output),
        }
    }
}

/// One tool round trip: the request and, once the tool finished, its response.
///
/// Fields are private so the call id correlation holds for every value
/// built through [`ToolCallExchange::new`]. Values that arrive through serde
/// bypass that check; call [`ToolCallExchange::verify`] on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallExchange {
    call_id: String,
    request: ToolCallRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response: Option<ToolCallResponse>,
}

impl ToolCallExchange {
    /// # Errors
    ///
    /// Fails when `call_id` differs from the request's or the response's call id.
    pub fn new(
        call_id: impl Into<String>,
        request: ToolCallRequest,
        response: Option<ToolCallResponse>,
    ) -> Result<Self, ToolExchangeError> {
        let exchange = Self {
            call_id: call_id.into(),
            request,
            response,
        };
        exchange.verify()?;
        Ok(exchange)
    }

    /// Opens an exchange keyed by the request's own call id.
    pub fn from_request(request: ToolCallRequest) -> Self {
        Self {
            call_id: request.call_id.clone(),
            request,
            response: None,
        }
    }

    /// Re-checks both correlations.
    ///
    /// # Errors
    ///
    /// Returns the error for the first correlation that does not hold.
    pub fn verify(&self) -> Result<(), ToolExchangeError> {
        if self.request.call_id != self.call_id {
            return Err(ToolExchangeError::CallIdMustMatchCallIdInRequest {
                expected: self.call_id.clone(),
                found: self.request.call_id.clone(),
            });
        }
        match &self.response {
            Some(response) if response.call_id != self.call_id => {
                Err(ToolExchangeError::CallIdMustMatchCallIdInResponse {
                    expected: self.call_id.clone(),
                    found: response.call_id.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Closes the exchange with the tool's response.
    ///
    /// # Errors
    ///
    /// Fails if a response is already attached or the call ids differ.
    pub fn with_response(mut self, response: ToolCallResponse) -> Result<Self, ToolExchangeError> {
        if self.response.is_some() {
            return Err(ToolExchangeError::ResponseAlreadyAttached {
                call_id: self.call_id,
            });
        }
        if response.call_id != self.call_id {
            return Err(ToolExchangeError::CallIdMustMatchCallIdInResponse {
                expected: self.call_id,
                found: response.call_id,
            });
        }
        self.response = Some(response);
        Ok(self)
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn request(&self) -> &ToolCallRequest {
        &self.request
    }

    pub fn response(&self) -> Option<&ToolCallResponse> {
        self.response.as_ref()
    }

    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }
}

impl fmt::Display for ToolCallExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.request)?;
        if let Some(response) = &self.response {
            write!(f, "\n{response}")?;
        }
        Ok(())
    }
}
