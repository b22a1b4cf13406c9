pub mod health;

use std::any::Any;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::chat::handlers;
use crate::cors;
use crate::errors::ChatError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let chat = post(handlers::handle_chat).options(handlers::handle_preflight);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/chat", chat.clone())
        // Path the portfolio front end calls.
        .route("/api/chat", chat)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::map_response(cors::allow_any_origin))
}

/// Converts a panicking handler into a logged 500 instead of a dropped connection.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ChatError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
