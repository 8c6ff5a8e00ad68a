pub mod error;
pub mod exchange;

pub use error::ToolExchangeError;
pub use exchange::{ToolCallExchange, ToolCallRequest, ToolCallResponse};

use schemars::{JsonSchema, generate::SchemaSettings};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A function the model may call, described by a JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters,
        }
    }

    /// Definition whose parameters are the schema of `T`.
    pub fn for_type<T: JsonSchema>(name: impl Into<String>) -> Self {
        Self::new(name, schema_for_type::<T>())
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// OpenAPI 3 flavoured schema of `T` with subschemas inlined and the
/// top-level title removed.
#[must_use]
pub fn schema_for_type<T: JsonSchema>() -> Value {
    let settings = SchemaSettings::openapi3().with(|s| {
        s.inline_subschemas = true;
        s.meta_schema = None;
    });
    let generator = schemars::generate::SchemaGenerator::new(settings);
    let mut schema_value: Value = generator.into_root_schema_for::<T>().into();

    if let Some(obj) = schema_value.as_object_mut() {
        obj.remove("title");
    }

    schema_value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Inner {
        value: u32,
    }

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Outer {
        name: String,
        inner: Inner,
    }

    #[test]
    fn schema_is_inlined_and_untitled() {
        let schema = schema_for_type::<Outer>();
        assert!(schema.get("title").is_none());
        assert!(schema.get("$schema").is_none());
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["inner"]["type"], "object");
        assert!(schema.to_string().find("$ref").is_none());
    }

    #[test]
    fn definition_for_type_uses_schema() {
        let tool = ToolDefinition::for_type::<Inner>("count").with_description("Counts");
        assert_eq!(tool.name, "count");
        assert_eq!(tool.parameters["properties"]["value"]["type"], "integer");
    }
}
