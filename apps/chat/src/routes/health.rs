use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    /// False while DEEPSEEK_API_KEY is unset; chat requests then return 500.
    pub upstream_configured: bool,
    pub model: String,
}

/// GET /health
/// Liveness plus whether the chat route can currently reach its upstream.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    let gateway = &state.gateway;
    Json(HealthReport {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        upstream_configured: gateway.credential().is_ok(),
        model: gateway.model().to_string(),
    })
}
