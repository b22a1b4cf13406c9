//! Axum route handlers for the chat API.

use axum::{
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use bytes::Bytes;
use tracing::debug;

use crate::chat::gateway::{ChatReply, Phase, UNKNOWN_CLIENT};
use crate::cors;
use crate::errors::ChatError;
use crate::state::AppState;

/// OPTIONS /chat
///
/// Answered before configuration or body are looked at.
pub async fn handle_preflight() -> Response {
    debug!(phase = ?Phase::ReceivedPreflight, "cors preflight");
    cors::preflight_response()
}

/// POST /chat
///
/// Body is `{"message": "..."}` or `{"messages": [{role, content}, ...]}`.
/// The raw bytes are taken so that unparseable JSON maps to a 400 with the
/// same error body as any other invalid request. A body the extractor refuses
/// (over the size limit, unreadable) is a 400 too, once the credential check
/// has passed.
pub async fn handle_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatReply>, ChatError> {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            state.gateway.credential()?;
            debug!("chat body rejected: {}", rejection.body_text());
            return Err(ChatError::invalid_messages());
        }
    };

    let reply = state.gateway.chat(client_ip(&headers), &body).await?;
    Ok(Json(reply))
}

/// First hop of `x-forwarded-for`, as set by the hosting proxy.
pub fn client_ip(headers: &HeaderMap) -> &str {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_client_ip_takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers), "203.0.113.7");
    }

    #[test]
    fn test_client_ip_defaults_to_unknown() {
        assert_eq!(client_ip(&HeaderMap::new()), UNKNOWN_CLIENT);

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        assert_eq!(client_ip(&headers), UNKNOWN_CLIENT);
    }
}
