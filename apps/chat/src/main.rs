mod chat;
mod config;
mod cors;
mod errors;
mod llm_client;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::gateway::ChatGateway;
use crate::chat::prompts::build_system_prompt;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::resume::{build_context, ResumeDocument};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("portfolio_chat={0},chat={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Record panics from any task instead of losing them on stderr.
    std::panic::set_hook(Box::new(|panic| {
        error!("Unhandled panic: {panic}");
    }));

    info!("Starting portfolio chat API v{}", env!("CARGO_PKG_VERSION"));

    // Resume context is computed once and shared read-only by every request.
    let resume = ResumeDocument::load(&config.resume_path).with_context(|| {
        format!(
            "Failed to load resume from {}",
            config.resume_path.display()
        )
    })?;
    let resume_context = build_context(&resume);
    let system_prompt = build_system_prompt(&resume.personal.name, &resume_context);
    info!(
        "System prompt ready ({} context bytes, {} prompt bytes)",
        resume_context.len(),
        system_prompt.len()
    );

    let llm = LlmClient::new(config.api_url.clone()).context("Failed to build HTTP client")?;
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        config.model,
        llm.api_url()
    );
    if config.credential().is_none() {
        error!("DEEPSEEK_API_KEY is not set; chat requests will fail until it is configured");
    }

    let gateway = ChatGateway::new(config.clone(), system_prompt, Arc::new(llm));
    let state = AppState {
        gateway: Arc::new(gateway),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
