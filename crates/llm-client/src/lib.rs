//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and an OpenAI implementation.
//! Transport-agnostic; used by the abstraction and agent crates.
//!
//! The trait covers the two completion capabilities the system consumes:
//! free-form chat completion and schema-constrained completion. Neither is
//! retried here; a call either returns or errors and the caller decides what
//! to do.

use anyhow::Result;
use async_trait::async_trait;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};
use prompt::{ChatMessage, MessageRole};

mod config;
mod openai_llm;

pub use config::{EnvLlmConfig, LlmConfig};
pub use openai_llm::OpenAILlmClient;

/// Completion service interface.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply text for the given messages
    /// (system/user/assistant).
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Schema-constrained completion: asks the model for a reply conforming
    /// to `schema` (a JSON Schema) and returns the parsed value.
    ///
    /// `Ok(None)` means the model produced no usable structured reply (no
    /// choices, empty content, or content that is not valid JSON); transport
    /// and API errors surface as `Err`. Normalizing here keeps backend
    /// differences out of the callers.
    async fn complete_structured(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<Option<serde_json::Value>>;
}

/// Masks an API key/token for safe logging: shows first 7 chars + "***" +
/// last 4 chars. If length <= 11, returns "***" to avoid leaking any part of
/// the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 {
        "***".to_string()
    } else {
        let head_len = 7.min(len);
        let tail_len = 4.min(len.saturating_sub(head_len));
        let head = &token[..head_len];
        let tail = if tail_len > 0 {
            &token[len - tail_len..]
        } else {
            ""
        };
        format!("{}***{}", head, tail)
    }
}

/// Converts a single [`ChatMessage`] into OpenAI API message format.
/// Content goes through the canonical stringification rule.
fn chat_message_to_openai(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let content = msg.content.to_text();
    let openai_msg: ChatCompletionRequestMessage = match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(openai_msg)
}
