//! Shared test utilities for tool box integration tests.
//!
//! Provides MockEmbeddingService (scripted vectors per input text) and
//! FailingEmbeddingService (errors on every call) so retrieval behavior can
//! be tested without external embedding APIs.

use async_trait::async_trait;
use embedding::EmbeddingService;
use std::collections::HashMap;

/// Mock embedding service: returns a scripted vector for known inputs and a
/// fixed default otherwise.
pub struct MockEmbeddingService {
    responses: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
}

impl MockEmbeddingService {
    pub fn new(default: Vec<f32>) -> Self {
        Self {
            responses: HashMap::new(),
            default,
        }
    }

    /// Scripts the vector returned for an exact input text.
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
impl EmbeddingService for MockEmbeddingService {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(self.lookup(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        Ok(texts.iter().map(|t| self.lookup(t)).collect())
    }
}

/// Embedding service that errors on every call. Used to prove code paths
/// that must not reach the embedding service.
pub struct FailingEmbeddingService;

#[async_trait]
impl EmbeddingService for FailingEmbeddingService {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Err(anyhow::anyhow!("embedding service must not be called"))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        Err(anyhow::anyhow!("embedding service must not be called"))
    }
}
