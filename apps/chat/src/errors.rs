use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const MISSING_CREDENTIAL_MESSAGE: &str = "DEEPSEEK_API_KEY is not configured.";
pub const INVALID_MESSAGES_MESSAGE: &str = "Missing or invalid messages in request body.";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to reach DeepSeek API. Please try again.";

/// Failure categories of a chat invocation.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, ChatError>`.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The upstream credential is absent. Needs operator action.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The caller sent something we cannot answer. Caller must fix and resubmit.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The upstream call failed or returned a non-200 status. Caller may retry.
    #[error("Upstream error: {detail}")]
    Gateway { detail: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ChatError {
    pub fn missing_credential() -> Self {
        ChatError::Configuration(MISSING_CREDENTIAL_MESSAGE.to_string())
    }

    pub fn invalid_messages() -> Self {
        ChatError::Validation(INVALID_MESSAGES_MESSAGE.to_string())
    }

    pub fn gateway(detail: impl Into<String>) -> Self {
        ChatError::Gateway {
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::Configuration(_) | ChatError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ChatError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatError::Gateway { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ChatError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                json!({ "error": msg })
            }
            ChatError::Validation(msg) => json!({ "error": msg }),
            ChatError::Gateway { detail } => {
                tracing::error!("Chat function error: {detail}");
                json!({ "error": UPSTREAM_FAILURE_MESSAGE, "detail": detail })
            }
            ChatError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                json!({ "error": "An internal server error occurred" })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: ChatError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_gateway_error_carries_detail() {
        let (status, body) = body_json(ChatError::gateway("DeepSeek API error 503: busy")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], UPSTREAM_FAILURE_MESSAGE);
        assert_eq!(body["detail"], "DeepSeek API error 503: busy");
    }

    #[tokio::test]
    async fn test_validation_error_has_no_detail() {
        let (status, body) = body_json(ChatError::invalid_messages()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], INVALID_MESSAGES_MESSAGE);
        assert!(body.get("detail").is_none());
    }

    #[tokio::test]
    async fn test_configuration_error_is_500() {
        let (status, body) = body_json(ChatError::missing_credential()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("API_KEY"));
    }
}
