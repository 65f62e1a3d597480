//! Client for OpenAI-compatible chat completion APIs.
//!
//! Sends `POST {base_url}/chat/completions` and reads
//! `choices[0].message.content`. Any server speaking the same protocol
//! (Azure OpenAI proxies, vLLM, Ollama's compatibility layer) works by
//! pointing `base_url` at it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{CompletionRequest, ModelTier, TextGenerator};
use crate::error::GenerationError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1";
pub const DEFAULT_DRAFT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Connection and model settings.
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Model for [`ModelTier::Standard`] requests.
    pub model: String,
    /// Model for [`ModelTier::Light`] requests.
    pub draft_model: String,
    /// Sampling temperature for standard requests. Light requests use the
    /// provider default.
    pub temperature: f32,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("draft_model", &self.draft_model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

// ---- wire types ----

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice; empty when the model returned none.
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default()
    }
}

// ---- client ----

/// HTTP client for one OpenAI-compatible endpoint.
pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> ChatCompletionBody<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let (model, temperature) = match request.tier {
            ModelTier::Standard => (self.config.model.as_str(), Some(self.config.temperature)),
            ModelTier::Light => (self.config.draft_model.as_str(), None),
        };
        ChatCompletionBody {
            model,
            messages,
            temperature,
        }
    }

    /// Ensure the response has a success status code, otherwise return
    /// [`GenerationError::Api`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        let body = self.body(&request);
        tracing::debug!(model = body.model, prompt_len = request.prompt.len(), "Calling chat completions");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url.trim_end_matches('/')))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let parsed: ChatCompletionResponse = response.json().await?;
        Ok(parsed.into_text())
    }
}
