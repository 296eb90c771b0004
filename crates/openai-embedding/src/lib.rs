//! # OpenAI Embedding Service
//!
//! Implementation of the `EmbeddingService` trait backed by OpenAI's
//! embeddings API (or any OpenAI-compatible endpoint via a custom base URL).
//!
//! ## Supported models
//!
//! - `text-embedding-3-small`: 1536 dimensions, cost-effective
//! - `text-embedding-3-large`: 3072 dimensions, higher accuracy
//!
//! The tool box stores whatever dimension the configured model returns; one
//! box must always be indexed with a single model configuration.

use async_openai::{types::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;
use embedding::EmbeddingService;
use tracing::{debug, info, instrument, warn};

/// OpenAI embedding service. Holds the async-openai client and model name.
#[derive(Debug, Clone)]
pub struct OpenAIEmbedding {
    client: Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIEmbedding {
    /// Creates a new OpenAI embedding service.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key. If empty, falls back to the
    ///   OPENAI_API_KEY environment variable.
    /// * `model` - Embedding model name (e.g. "text-embedding-3-large").
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_base_url(api_key, model, None)
    }

    /// Creates a new OpenAI embedding service with an optional base URL for
    /// OpenAI-compatible endpoints.
    pub fn new_with_base_url(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let api_key = if api_key.is_empty() {
            std::env::var("OPENAI_API_KEY").unwrap_or_default()
        } else {
            api_key
        };

        let mut openai_config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            openai_config = openai_config.with_api_base(url);
        }
        let client = Client::with_config(openai_config);

        Self { client, model }
    }

    /// Creates a new OpenAI embedding service with the default model
    /// (`text-embedding-3-large`).
    pub fn with_api_key(api_key: String) -> Self {
        Self::new(api_key, "text-embedding-3-large".to_string())
    }

    /// Sets a different embedding model.
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Returns the embedding model name (for tests and diagnostics).
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingService for OpenAIEmbedding {
    /// Generates an embedding vector for a single text string.
    ///
    /// Sends one request to the embeddings endpoint and returns the first
    /// embedding from the response. Vector length depends on the configured
    /// model.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is invalid, the request fails or times
    /// out, or the response carries no embedding data.
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        // Covers connect + request + response for one embed call.
        const EMBED_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

        info!(model = %self.model, text_len = text.len(), "OpenAI embed request");

        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(vec![text])
            .build()?;

        let embeddings = self.client.embeddings();
        let create_future = embeddings.create(request);
        let response = match tokio::time::timeout(EMBED_TIMEOUT, create_future).await {
            Ok(Ok(r)) => {
                debug!("OpenAI embed response received");
                r
            }
            Ok(Err(e)) => {
                warn!(error = %e, "OpenAI embed request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(
                    timeout_secs = EMBED_TIMEOUT.as_secs(),
                    "OpenAI embed request timed out"
                );
                return Err(anyhow::anyhow!(
                    "OpenAI embed request timed out after {} seconds",
                    EMBED_TIMEOUT.as_secs()
                ));
            }
        };

        let embedding = match response.data.first() {
            Some(item) => item.embedding.clone(),
            None => {
                warn!("OpenAI embed response has no embedding data");
                return Err(anyhow::anyhow!("No embedding in response"));
            }
        };

        info!(dimension = embedding.len(), "OpenAI embed done");
        Ok(embedding)
    }

    /// Generates embedding vectors for multiple texts in a single API call.
    ///
    /// Returns one vector per input, in input order. The response count is
    /// validated against the input count.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or times out, or if the response
    /// carries a different number of embeddings than inputs.
    #[instrument(skip(self, texts), fields(model = %self.model, batch_size = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            debug!("OpenAI embed_batch empty input, skipping");
            return Ok(vec![]);
        }

        // Larger payloads get a longer window than single embeds.
        const EMBED_BATCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

        info!(
            model = %self.model,
            batch_size = texts.len(),
            "OpenAI embed_batch request"
        );

        let inputs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();

        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(inputs)
            .build()?;

        let embeddings = self.client.embeddings();
        let create_future = embeddings.create(request);
        let response = match tokio::time::timeout(EMBED_BATCH_TIMEOUT, create_future).await {
            Ok(Ok(r)) => {
                debug!("OpenAI embed_batch response received");
                r
            }
            Ok(Err(e)) => {
                warn!(error = %e, "OpenAI embed_batch request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(
                    timeout_secs = EMBED_BATCH_TIMEOUT.as_secs(),
                    "OpenAI embed_batch request timed out"
                );
                return Err(anyhow::anyhow!(
                    "OpenAI embed_batch request timed out after {} seconds",
                    EMBED_BATCH_TIMEOUT.as_secs()
                ));
            }
        };

        let embeddings: Vec<Vec<f32>> = response
            .data
            .into_iter()
            .map(|item| item.embedding)
            .collect();

        if embeddings.len() != texts.len() {
            warn!(
                expected = texts.len(),
                got = embeddings.len(),
                "OpenAI embed_batch response count mismatch"
            );
            return Err(anyhow::anyhow!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            ));
        }

        let dimension = embeddings.first().map(|v| v.len()).unwrap_or(0);
        info!(
            count = embeddings.len(),
            dimension = dimension,
            "OpenAI embed_batch done"
        );
        Ok(embeddings)
    }
}
