use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::chat::conversation::{parse_chat_request, Conversation, ConversationTurn, Role};
use crate::config::Config;
use crate::errors::ChatError;
use crate::llm_client::{CompletionRequest, CompletionResponse, CompletionTransport, RawResponse};

/// Reply used when the upstream answers 200 without any completion text.
pub const FALLBACK_REPLY: &str = "No response from model.";

/// Client address recorded when the request carries none.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Where a single invocation is. Nothing here outlives the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ReceivedPreflight,
    Validating,
    AwaitingUpstream,
    Responding,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Turns an inbound chat request into exactly one upstream completion call.
///
/// The system prompt is computed once at startup and shared read-only across
/// invocations; the configuration is read on every call so a missing
/// credential is reported per request.
pub struct ChatGateway {
    config: Config,
    system_prompt: Arc<str>,
    transport: Arc<dyn CompletionTransport>,
}

impl ChatGateway {
    pub fn new(
        config: Config,
        system_prompt: impl Into<Arc<str>>,
        transport: Arc<dyn CompletionTransport>,
    ) -> Self {
        Self {
            config,
            system_prompt: system_prompt.into(),
            transport,
        }
    }

    /// Validates the body, calls the upstream once and shapes the reply.
    /// The credential check runs before the body is looked at.
    /// `client_ip` is only recorded in the chat log.
    pub async fn chat(&self, client_ip: &str, body: &[u8]) -> Result<ChatReply, ChatError> {
        let result = self.run(client_ip, body).await;
        match &result {
            Ok(_) => debug!(phase = ?Phase::Responding, "chat request answered"),
            Err(e) => debug!(phase = ?Phase::Failed, error = %e, "chat request failed"),
        }
        result
    }

    /// The upstream credential, or the configuration error every chat
    /// request gets while it is missing.
    pub fn credential(&self) -> Result<&str, ChatError> {
        self.config
            .credential()
            .ok_or_else(ChatError::missing_credential)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn run(&self, client_ip: &str, body: &[u8]) -> Result<ChatReply, ChatError> {
        let api_key = self.credential()?;

        debug!(phase = ?Phase::Validating, body_bytes = body.len());
        let request = parse_chat_request(body)?;
        let session_id = request.session_id;
        let conversation = request.conversation;
        let question = conversation.question().to_string();
        let turn = conversation.user_turns();

        let upstream = self.build_upstream_request(conversation);
        debug!(
            phase = ?Phase::AwaitingUpstream,
            model = %upstream.model,
            messages = upstream.messages.len()
        );
        let raw = self
            .transport
            .send(api_key, &upstream)
            .await
            .map_err(|e| ChatError::gateway(e.to_string()))?;

        let reply = map_upstream_response(raw)?;

        info!(
            target: "chat",
            session_id = session_id.as_deref().unwrap_or(""),
            ip = client_ip,
            turn,
            question = %question,
            reply = %reply,
            "chat exchange"
        );

        Ok(ChatReply { reply })
    }

    /// System turn first, then the caller's turns unchanged.
    pub fn build_upstream_request(&self, conversation: Conversation) -> CompletionRequest {
        let mut messages = Vec::with_capacity(conversation.turns().len() + 1);
        messages.push(ConversationTurn::new(Role::System, &*self.system_prompt));
        messages.extend(conversation.into_turns());
        CompletionRequest::new(self.config.model.clone(), messages)
    }
}

/// Anything but a 200 is a gateway failure carrying the upstream status and
/// body. A 200 yields the first choice's text, or the fallback reply.
pub fn map_upstream_response(raw: RawResponse) -> Result<String, ChatError> {
    if raw.status != 200 {
        return Err(ChatError::gateway(format!(
            "DeepSeek API error {}: {}",
            raw.status, raw.body
        )));
    }

    let completion: CompletionResponse = serde_json::from_str(&raw.body)
        .map_err(|e| ChatError::gateway(format!("Invalid DeepSeek API response: {e}")))?;

    Ok(completion
        .text()
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_REPLY.to_string()))
}
