//! Shared test utilities: a scripted completion client so abstraction
//! behavior can be tested without an LLM backend.

use async_trait::async_trait;
use llm_client::LlmClient;
use prompt::ChatMessage;

/// What `complete_structured` should do.
pub enum StructuredBehavior {
    /// Return `Ok(Some(value))`.
    Value(serde_json::Value),
    /// Return `Ok(None)` (no usable structured reply).
    Empty,
    /// Return `Err` (service failure).
    Fail,
}

/// Scripted [`LlmClient`]: fixed free-form reply (or failure) and a fixed
/// structured behavior.
pub struct MockLlmClient {
    complete_reply: Option<String>,
    structured: StructuredBehavior,
}

impl MockLlmClient {
    /// Free-form completion replies with `reply`; structured calls fail.
    pub fn completing(reply: &str) -> Self {
        Self {
            complete_reply: Some(reply.to_string()),
            structured: StructuredBehavior::Fail,
        }
    }

    /// Structured completion follows `behavior`; free-form calls fail.
    pub fn structured(behavior: StructuredBehavior) -> Self {
        Self {
            complete_reply: None,
            structured: behavior,
        }
    }

    /// Every call fails.
    pub fn failing() -> Self {
        Self {
            complete_reply: None,
            structured: StructuredBehavior::Fail,
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        self.complete_reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("completion service unavailable"))
    }

    async fn complete_structured(
        &self,
        _prompt: &str,
        _schema: serde_json::Value,
    ) -> anyhow::Result<Option<serde_json::Value>> {
        match &self.structured {
            StructuredBehavior::Value(value) => Ok(Some(value.clone())),
            StructuredBehavior::Empty => Ok(None),
            StructuredBehavior::Fail => Err(anyhow::anyhow!("completion service unavailable")),
        }
    }
}
