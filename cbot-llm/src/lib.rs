//! # cbot-llm
//!
//! Chat-completion client abstraction and its OpenAI implementation. The
//! [`LlmClient`] trait keeps the orchestrator transport-agnostic and
//! mockable; the implementation logs a masked API key and token usage.

use std::sync::Arc;

use anyhow::Result;
use async_openai::{
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use cbot_core::{ChatTurn, Role};

/// Chat-completion capability: full ordered history in, one assistant reply
/// out. Object-safe so handlers can hold `Arc<dyn LlmClient>`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, turns: Vec<ChatTurn>) -> Result<String>;
}

/// Masks an API key for safe logging: first 7 chars + "***" + last 4 chars;
/// keys of 11 chars or fewer collapse to "***" entirely.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}

/// OpenAI chat client over [async-openai].
#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Arc<Client<async_openai::config::OpenAIConfig>>,
    model: String,
    /// Stored only for masked logging.
    api_key_for_logging: String,
}

impl OpenAiChatClient {
    /// Builds a client with the default API base URL.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let api_key = api_key.into();
        let config = async_openai::config::OpenAIConfig::new().with_api_key(api_key.clone());
        Self {
            client: Arc::new(Client::with_config(config)),
            model: model.into(),
            api_key_for_logging: api_key,
        }
    }

    /// Builds a client with a custom base URL (proxies, compatible endpoints).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let api_key = api_key.into();
        let config = async_openai::config::OpenAIConfig::new()
            .with_api_key(api_key.clone())
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            model: model.into(),
            api_key_for_logging: api_key,
        }
    }
}

/// Converts one conversation turn into the OpenAI message format.
fn turn_to_openai(turn: &ChatTurn) -> Result<ChatCompletionRequestMessage> {
    let content = turn.content.clone();
    let message: ChatCompletionRequestMessage = match turn.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(message)
}

#[async_trait]
impl LlmClient for OpenAiChatClient {
    async fn complete(&self, turns: Vec<ChatTurn>) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> =
            turns.iter().map(turn_to_openai).collect::<Result<_>>()?;

        tracing::info!(
            model = %self.model,
            message_count = messages.len(),
            api_key = %mask_token(&self.api_key_for_logging),
            "chat completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()?;

        let response = self.client.chat().create(request).await?;

        if let Some(ref usage) = response.usage {
            tracing::info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "chat completion usage"
            );
        }

        match response.choices.first() {
            Some(choice) => Ok(choice.message.content.clone().unwrap_or_default()),
            None => anyhow::bail!("No response from model"),
        }
    }
}
