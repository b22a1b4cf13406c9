/// LLM Client — the single point of entry for calls to the upstream
/// chat-completion API.
///
/// One request in, one HTTP call out. There are no retries and no timeout
/// beyond the transport default: a failed call is reported to the caller,
/// who may retry.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::chat::conversation::ConversationTurn;

/// Sampling temperature for every completion. Kept low so answers stay close
/// to the resume text.
pub const TEMPERATURE: f64 = 0.1;
pub const MAX_TOKENS: u32 = 800;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Wire body of an outbound chat-completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ConversationTurn>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ConversationTurn>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

/// Status and body of an upstream reply, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice, if the upstream produced one.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}

/// Seam between the gateway and the network. `LlmClient` is the production
/// implementation; tests substitute an in-process fake.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn send(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<RawResponse, LlmError>;
}

/// reqwest-backed client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_url: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_url: api_url.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl CompletionTransport for LlmClient {
    async fn send(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<RawResponse, LlmError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(
            "Upstream call finished: status={status}, body_bytes={}",
            body.len()
        );

        Ok(RawResponse { status, body })
    }
}
