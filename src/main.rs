// Start of file: src/main.rs

use axum::{serve, Router};
use tokio::net::TcpListener;

use edu_api::config::state::AppState;
use edu_api::core::{logging::init_tracing, server::{create_app, setup_listener, shutdown_signal}};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let state: AppState = AppState::instance().clone();
    state.initialize().await;

    let app: Router = create_app(state.clone());
    let listener: TcpListener = setup_listener(&state.environment).await?;

    tracing::info!(
        "Server listening on: {} (AI service: {}, Ollama fallback: {})",
        listener.local_addr()?,
        state.environment.ai_service_url,
        state.environment.ollama_url,
    );

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

// End of file: src/main.rs
