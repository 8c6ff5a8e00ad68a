use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The payload of a system, user or assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Content {
    Text(String),
    /// A file previously uploaded to the provider.
    FileId(String),
    /// Raw image bytes. `mime_subtype` is the part after `image/`, e.g. `png`.
    Image {
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
        mime_subtype: String,
    },
    ImageUrl(String),
    /// Inline structured data, sent to providers as pretty-printed JSON.
    Object(Value),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn image(data: impl Into<Vec<u8>>, mime_subtype: impl Into<String>) -> Self {
        Self::Image {
            data: data.into(),
            mime_subtype: mime_subtype.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Human-readable rendering of any variant. Never fails.
    #[must_use]
    pub fn text_representation(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::FileId(id) => format!("[file:{id}]"),
            Self::Image { data, mime_subtype } => {
                format!("[image/{mime_subtype}: {} bytes]", data.len())
            }
            Self::ImageUrl(url) => format!("[image:{url}]"),
            Self::Object(value) => pretty_json(value),
        }
    }

    /// `image/<subtype>` for inline images.
    pub fn media_type(&self) -> Option<String> {
        match self {
            Self::Image { mime_subtype, .. } => Some(format!("image/{mime_subtype}")),
            _ => None,
        }
    }

    /// `data:` URL for inline images, as accepted by OpenAI image inputs.
    pub fn data_url(&self) -> Option<String> {
        match self {
            Self::Image { data, mime_subtype } => Some(format!(
                "data:image/{mime_subtype};base64,{}",
                STANDARD.encode(data)
            )),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::FileId(_) => "fileId",
            Self::Image { .. } => "image",
            Self::ImageUrl(_) => "imageUrl",
            Self::Object(_) => "object",
        }
    }
}

pub(crate) fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[object]".to_string())
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
