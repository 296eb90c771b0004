//! Embedding configuration: trait and env-based implementation.

use anyhow::Result;
use std::env;

/// Embedding service configuration interface.
pub trait EmbeddingConfig: Send + Sync {
    fn provider(&self) -> &str;
    /// API key for OpenAI-compatible embedding (OPENAI_API_KEY).
    fn openai_api_key(&self) -> &str;
    /// Optional base URL for OpenAI-compatible embedding (OPENAI_BASE_URL).
    /// When set, embedding requests use this URL instead of the default API.
    fn openai_base_url(&self) -> Option<&str>;
    /// Embedding model name (EMBEDDING_MODEL).
    fn model(&self) -> &str;
}

/// Embedding config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvEmbeddingConfig {
    pub embedding_provider: String,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub embedding_model: String,
}

impl EmbeddingConfig for EnvEmbeddingConfig {
    fn provider(&self) -> &str {
        &self.embedding_provider
    }
    fn openai_api_key(&self) -> &str {
        &self.openai_api_key
    }
    fn openai_base_url(&self) -> Option<&str> {
        self.openai_base_url.as_deref().filter(|s| !s.is_empty())
    }
    fn model(&self) -> &str {
        &self.embedding_model
    }
}

impl EnvEmbeddingConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let embedding_provider =
            env::var("EMBEDDING_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let embedding_model = env::var("EMBEDDING_MODEL")
            .unwrap_or_else(|_| "text-embedding-3-large".to_string());
        Ok(Self {
            embedding_provider,
            openai_api_key,
            openai_base_url,
            embedding_model,
        })
    }

    /// Validate config (the openai provider requires OPENAI_API_KEY).
    pub fn validate(&self) -> Result<()> {
        if self.embedding_provider.eq_ignore_ascii_case("openai")
            && self.openai_api_key.is_empty()
        {
            anyhow::bail!("EMBEDDING_PROVIDER=openai requires OPENAI_API_KEY to be set");
        }
        Ok(())
    }
}
