//! Prompt layouts for local models that take one raw string instead of a
//! chat turn list.

use super::PromptTemplate;

const LLAMA2_CHAT: &str = "<s>[INST] <<SYS>>\n{system}\n<</SYS>>\n{user}\n[/INST]";

const CHATML: &str = "<|im_start|>system\n{system}<|im_end|>\n\
<|im_start|>user\n{user}<|im_end|>\n\
<|im_start|>assistant";

/// Llama 2 chat layout with a `<<SYS>>` block.
pub fn llama2_chat(system: impl Into<String>, user: impl Into<String>) -> PromptTemplate {
    PromptTemplate::new("llama2_chat", LLAMA2_CHAT)
        .slot("system", system)
        .slot("user", user)
}

/// ChatML layout, as used by Qwen models. Ends on an open assistant turn.
pub fn chatml(system: impl Into<String>, user: impl Into<String>) -> PromptTemplate {
    PromptTemplate::new("chatml", CHATML)
        .slot("system", system)
        .slot("user", user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llama2_layout() {
        assert_eq!(
            llama2_chat("Be exact.", "List the names.").render(),
            "<s>[INST] <<SYS>>\nBe exact.\n<</SYS>>\nList the names.\n[/INST]"
        );
    }

    #[test]
    fn chatml_layout() {
        assert_eq!(
            chatml("Be exact.", "List the names.").render(),
            "<|im_start|>system\nBe exact.<|im_end|>\n<|im_start|>user\nList the names.<|im_end|>\n<|im_start|>assistant"
        );
    }
}
