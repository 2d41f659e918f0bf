//! Chat-completion transport.
//!
//! Speaks the OpenAI-compatible `chat/completions` shape: a bearer token, a
//! `{model, messages, temperature}` body and `choices[0].message.content`
//! back. One attempt per call.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;

#[derive(Debug, thiserror::Error)]
pub enum AiClientError {
    #[error("AI client is disabled because no API key is configured")]
    Disabled,
    #[error("could not build HTTP client: {0}")]
    Configuration(String),
    #[error("AI request timed out after {0}s")]
    Timeout(u64),
    #[error("AI request failed: {0}")]
    Transport(String),
    #[error("AI endpoint answered with status {status}")]
    Status { status: u16, body: String },
    #[error("AI response could not be read: {0}")]
    Response(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: ChatRole::User,
            content: MessageContent::Parts(parts),
        }
    }
}

/// Provider-neutral request; the client adds the model name.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

pub trait ChatCompletionClient: Send + Sync {
    /// Whether a call can be attempted at all.
    fn is_enabled(&self) -> bool;

    /// Raw text of the first choice.
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<String, AiClientError>> + Send;
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// `reqwest` client for a hosted chat-completion endpoint.
pub struct HttpChatClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for HttpChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("enabled", &self.api_key.is_some())
            .finish()
    }
}

impl HttpChatClient {
    pub fn from_config(config: &AiConfig) -> Result<Self, AiClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| AiClientError::Configuration(err.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

impl ChatCompletionClient for HttpChatClient {
    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, AiClientError> {
        let api_key = self.api_key.as_deref().ok_or(AiClientError::Disabled)?;
        let body = CompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    AiClientError::Timeout(self.timeout_secs)
                } else {
                    AiClientError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|err| AiClientError::Response(err.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AiClientError::Response("no choices in completion".to_string()))?;

        debug!(model = %self.model, chars = content.len(), "chat completion received");
        Ok(content)
    }
}
