//! Language model capability and its OpenAI-compatible implementation.

use crate::config::RagSettings;
use crate::error::{Result, TubeQaError};
use crate::openai::{create_client, ClientOptions};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::error::OpenAIError;
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

/// A single message sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Capability for generating text from a list of messages.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Chat completion model behind any OpenAI-compatible API.
pub struct OpenAIChatModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIChatModel {
    /// Create a model for an existing client.
    pub fn with_client(client: Client<OpenAIConfig>, model: &str, temperature: f32) -> Self {
        Self {
            client,
            model: model.to_string(),
            temperature,
        }
    }

    /// Create a model from settings.
    pub fn from_settings(settings: &RagSettings) -> Result<Self> {
        let client = create_client(&ClientOptions {
            api_base: settings.api_base.clone(),
            api_key_env: Some(settings.api_key_env.clone()),
            timeout: Some(Duration::from_secs(settings.request_timeout_secs)),
        })?;
        Ok(Self::with_client(client, &settings.model, settings.temperature))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let built: std::result::Result<ChatCompletionRequestMessage, OpenAIError> = match message.role {
        ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map(Into::into),
        ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map(Into::into),
    };
    built.map_err(|e| TubeQaError::Rag(e.to_string()))
}

#[async_trait]
impl LanguageModel for OpenAIChatModel {
    #[instrument(skip(self, messages), fields(model = %self.model, messages = messages.len()))]
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        let messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| TubeQaError::Rag(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| TubeQaError::OpenAI(format!("Failed to generate response: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| TubeQaError::Rag("Empty response from LLM".to_string()))?
            .clone();

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }
}
