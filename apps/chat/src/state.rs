use std::sync::Arc;

use crate::chat::gateway::ChatGateway;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ChatGateway>,
}
