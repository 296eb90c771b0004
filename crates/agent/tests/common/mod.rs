//! Shared test utilities for workflow integration tests: a recording
//! completion client and a scripted embedding service, so the workflow runs
//! without external APIs.

use async_trait::async_trait;
use embedding::EmbeddingService;
use llm_client::LlmClient;
use prompt::ChatMessage;
use std::collections::HashMap;
use std::sync::Mutex;

/// Completion client that records every `complete` call and answers with a
/// fixed reply.
pub struct RecordingLlmClient {
    reply: String,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl RecordingLlmClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Messages sent on the `index`-th completion call.
    pub fn sent_messages(&self, index: usize) -> Vec<ChatMessage> {
        self.calls.lock().unwrap()[index].clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for RecordingLlmClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(messages);
        Ok(self.reply.clone())
    }

    async fn complete_structured(
        &self,
        _prompt: &str,
        _schema: serde_json::Value,
    ) -> anyhow::Result<Option<serde_json::Value>> {
        Err(anyhow::anyhow!("structured completion not scripted"))
    }
}

/// Embedding service returning scripted vectors per input text with a fixed
/// default.
pub struct ScriptedEmbeddingService {
    responses: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
}

impl ScriptedEmbeddingService {
    pub fn new(default: Vec<f32>) -> Self {
        Self {
            responses: HashMap::new(),
            default,
        }
    }

    pub fn with_response(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.responses.insert(text.to_string(), vector);
        self
    }

    fn lookup(&self, text: &str) -> Vec<f32> {
        self.responses
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl EmbeddingService for ScriptedEmbeddingService {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(self.lookup(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        Ok(texts.iter().map(|t| self.lookup(t)).collect())
    }
}
