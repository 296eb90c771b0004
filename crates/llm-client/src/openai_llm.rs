//! OpenAI implementation of [`LlmClient`]: chat completion plus
//! schema-constrained completion via `response_format = json_schema`.

use anyhow::Result;
use async_trait::async_trait;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    ResponseFormatJsonSchema,
};
use async_openai::Client;
use prompt::ChatMessage;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{chat_message_to_openai, mask_token, LlmClient, LlmConfig};

/// Schema name sent with structured requests; the API requires one.
const STRUCTURED_SCHEMA_NAME: &str = "structured_response";

/// OpenAI-backed [`LlmClient`]. Wraps the async-openai client; optionally
/// holds the API key for masked logging and a system prompt prepended to
/// every request.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: Arc<Client<async_openai::config::OpenAIConfig>>,
    model: String,
    system_prompt: Option<String>,
    /// API key stored only for logging (masked).
    api_key_for_logging: Option<String>,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Arc::new(Client::with_config(config)),
            model: "gpt-4o".to_string(),
            system_prompt: None,
            api_key_for_logging,
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = async_openai::config::OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            model: "gpt-4o".to_string(),
            system_prompt: None,
            api_key_for_logging,
        }
    }

    /// Builds a client from a config source (API key, base URL, model,
    /// optional system prompt).
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        let mut client =
            Self::with_base_url(config.api_key().to_string(), config.base_url().to_string())
                .with_model(config.model().to_string());
        client.system_prompt = config.system_prompt().map(str::to_string);
        client
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    fn masked_key(&self) -> String {
        self.api_key_for_logging
            .as_deref()
            .map(mask_token)
            .unwrap_or_else(|| "***".to_string())
    }

    fn log_usage(response: &async_openai::types::CreateChatCompletionResponse) {
        if let Some(ref u) = response.usage {
            info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "OpenAI chat completion usage"
            );
        }
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages), fields(model = %self.model))]
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let mut openai_messages: Vec<ChatCompletionRequestMessage> = Vec::new();
        if let Some(system) = &self.system_prompt {
            openai_messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.clone())
                    .build()?
                    .into(),
            );
        }
        for msg in &messages {
            openai_messages.push(chat_message_to_openai(msg)?);
        }

        info!(
            model = %self.model,
            message_count = openai_messages.len(),
            api_key = %self.masked_key(),
            "OpenAI complete request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(openai_messages)
            .build()?;

        let response = self.client.chat().create(request).await?;
        Self::log_usage(&response);

        if let Some(choice) = response.choices.first() {
            Ok(choice.message.content.clone().unwrap_or_default())
        } else {
            anyhow::bail!("No response from OpenAI");
        }
    }

    #[instrument(skip(self, prompt, schema), fields(model = %self.model))]
    async fn complete_structured(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<Option<serde_json::Value>> {
        info!(
            model = %self.model,
            prompt_len = prompt.len(),
            api_key = %self.masked_key(),
            "OpenAI complete_structured request"
        );

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.to_string())
                .build()?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: STRUCTURED_SCHEMA_NAME.to_string(),
                    schema: Some(schema),
                    strict: Some(true),
                },
            })
            .build()?;

        let response = self.client.chat().create(request).await?;
        Self::log_usage(&response);

        let content = match response.choices.first() {
            Some(choice) => choice.message.content.clone().unwrap_or_default(),
            None => {
                warn!("OpenAI complete_structured response has no choices");
                return Ok(None);
            }
        };
        if content.trim().is_empty() {
            warn!("OpenAI complete_structured response content is empty");
            return Ok(None);
        }

        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(error = %e, "OpenAI complete_structured content is not valid JSON");
                Ok(None)
            }
        }
    }
}
