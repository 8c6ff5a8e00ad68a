//! Named prompt templates with explicit substitution slots.
//!
//! A placeholder is either `{name}` or the scoped form `\Scope.name`, where
//! both parts are identifiers. Anything else in braces, such as a literal
//! JSON example, is left alone.

pub mod chat_formats;

use std::ops::Range;

use serde::Serialize;

use crate::message::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    template: String,
    slots: Vec<(String, String)>,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            slots: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Sets a text slot, replacing any earlier value under the same name.
    #[must_use]
    pub fn slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.slots.iter_mut().find(|(slot, _)| *slot == name) {
            Some((_, existing)) => *existing = value,
            None => self.slots.push((name, value)),
        }
        self
    }

    /// Sets a slot to the JSON encoding of `value`. Strings are inserted as
    /// is, without quotes.
    ///
    /// # Errors
    ///
    /// Fails when `value` cannot be serialized.
    pub fn json_slot<T: Serialize + ?Sized>(
        self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        let text = match serde_json::to_value(value)? {
            serde_json::Value::String(text) => text,
            other => serde_json::to_string(&other)?,
        };
        Ok(self.slot(name, text))
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|(slot, _)| slot == name)
            .map(|(_, value)| value.as_str())
    }

    /// Substitutes every placeholder that has a slot. Placeholders without
    /// one stay in the text verbatim and are logged.
    pub fn render(&self) -> String {
        let mut rendered = String::with_capacity(self.template.len());
        let mut unresolved = Vec::new();
        let mut last = 0;
        for placeholder in placeholders(&self.template) {
            match self.value(placeholder.name) {
                Some(value) => {
                    rendered.push_str(&self.template[last..placeholder.span.start]);
                    rendered.push_str(value);
                    last = placeholder.span.end;
                }
                None => unresolved.push(placeholder.name),
            }
        }
        rendered.push_str(&self.template[last..]);

        if !unresolved.is_empty() {
            log::warn!(
                "template `{}` has unresolved placeholders: {}",
                self.name,
                unresolved.join(", ")
            );
        }
        rendered
    }

    /// Names of placeholders that have no slot, in order of first use.
    pub fn unresolved_placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for placeholder in placeholders(&self.template) {
            if self.value(placeholder.name).is_none()
                && !names.iter().any(|name| name == placeholder.name)
            {
                names.push(placeholder.name.to_string());
            }
        }
        names
    }

    /// The rendered text as a user message.
    pub fn to_message(&self) -> Message {
        Message::user(self.render())
    }

    pub fn into_message(self) -> Message {
        self.to_message()
    }
}

impl From<PromptTemplate> for Message {
    fn from(template: PromptTemplate) -> Self {
        template.into_message()
    }
}

struct Placeholder<'a> {
    span: Range<usize>,
    name: &'a str,
}

fn placeholders(template: &str) -> Vec<Placeholder<'_>> {
    let bytes = template.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let placeholder = match bytes[i] {
            b'{' => braced(template, i),
            b'\\' => scoped(template, i),
            _ => None,
        };
        match placeholder {
            Some(placeholder) => {
                i = placeholder.span.end;
                found.push(placeholder);
            }
            None => i += 1,
        }
    }
    found
}

/// End of the identifier starting at `start`, if one starts there.
fn ident_end(bytes: &[u8], start: usize) -> Option<usize> {
    let first = *bytes.get(start)?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let len = bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    Some(start + len)
}

fn braced(template: &str, start: usize) -> Option<Placeholder<'_>> {
    let bytes = template.as_bytes();
    let end = ident_end(bytes, start + 1)?;
    (bytes.get(end) == Some(&b'}')).then(|| Placeholder {
        span: start..end + 1,
        name: &template[start + 1..end],
    })
}

fn scoped(template: &str, start: usize) -> Option<Placeholder<'_>> {
    let bytes = template.as_bytes();
    let scope_end = ident_end(bytes, start + 1)?;
    if bytes.get(scope_end) != Some(&b'.') {
        return None;
    }
    let end = ident_end(bytes, scope_end + 1)?;
    Some(Placeholder {
        span: start..end,
        name: &template[scope_end + 1..end],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fills_every_placeholder() {
        let template = PromptTemplate::new("capital", "What is the capital of {country} in {year}?")
            .slot("country", "France")
            .slot("year", "1900");
        let text = template.render();
        assert_eq!(text, "What is the capital of France in 1900?");
        assert!(!text.contains("{country}"));
        assert!(template.unresolved_placeholders().is_empty());
    }

    #[test]
    fn missing_slots_stay_verbatim() {
        let template = PromptTemplate::new("capital", "Capital of {country}, said {speaker}")
            .slot("country", "Peru");
        assert_eq!(template.render(), "Capital of Peru, said {speaker}");
        assert_eq!(template.unresolved_placeholders(), vec!["speaker"]);
    }

    #[test]
    fn scoped_placeholders_ignore_the_scope() {
        let template = PromptTemplate::new(
            "extract",
            "system: \\Self.system_message\nuser: \\ExtractPrompt.user_message.",
        )
        .slot("system_message", "be exact")
        .slot("user_message", "find names");
        assert_eq!(template.render(), "system: be exact\nuser: find names.");
    }

    #[test]
    fn json_braces_are_not_placeholders() {
        let template =
            PromptTemplate::new("json", r#"Answer like {"city": "..."} for {country}"#)
                .slot("country", "Chile");
        assert_eq!(template.render(), r#"Answer like {"city": "..."} for Chile"#);
        assert!(template.unresolved_placeholders().is_empty());
    }

    #[test]
    fn json_slots_encode_structured_values() {
        let template = PromptTemplate::new("data", "Input: {input} by {author}")
            .json_slot("input", &json!({"items": [1, 2]}))
            .unwrap()
            .json_slot("author", "Ada")
            .unwrap();
        assert_eq!(template.render(), r#"Input: {"items":[1,2]} by Ada"#);
    }

    #[test]
    fn later_slot_values_win() {
        let template = PromptTemplate::new("t", "{x}").slot("x", "1").slot("x", "2");
        assert_eq!(template.render(), "2");
    }

    #[test]
    fn renders_into_a_user_message() {
        let message = PromptTemplate::new("t", "Hi {name}").slot("name", "Bo").into_message();
        assert_eq!(message, Message::user("Hi Bo"));
    }
}
