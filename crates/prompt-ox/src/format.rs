use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// What shape the provider is asked to answer in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Text,
    JsonObject,
    JsonSchema { schema: Value, name: String },
}

impl ResponseFormat {
    pub fn json_schema(schema: Value, name: impl Into<String>) -> Self {
        Self::JsonSchema {
            schema,
            name: name.into(),
        }
    }
}

/// Which wire protocol an adapter speaks.
///
/// `Standard` is text only. `Advanced` carries tool calls, reasoning and
/// structured output.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApiType {
    #[default]
    Standard,
    Advanced,
}
