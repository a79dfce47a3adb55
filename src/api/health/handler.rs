// Liveness and dependency health endpoints

use serde_json::json;
use axum::{extract::State, http::StatusCode};

use crate::config::state::AppState;
use crate::utils::response_handler::HandlerResponse;
use tracing::{instrument, info, warn};

/// Returns API status and instance information
#[instrument(skip(state))]
pub async fn status_handler(State(state): State<AppState>) -> HandlerResponse {
    info!("Status endpoint called");

    HandlerResponse::new(StatusCode::OK)
        .data(json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "status": "healthy",
            "environment": state.environment.environment.as_ref(),
            "instance": get_instance_identifier(),
        }))
        .message("API is running successfully")
}

/// Health check endpoint that verifies Redis connectivity
#[instrument(skip(state))]
pub async fn redis_health_handler(State(state): State<AppState>) -> HandlerResponse {
    match state.redis.ping().await {
        Ok(()) => HandlerResponse::new(StatusCode::OK)
            .data(json!({ "redis": "connected" }))
            .message("Redis connection healthy"),
        Err(e) => {
            warn!("Redis health check failed: {:#}", e);
            HandlerResponse::new(StatusCode::SERVICE_UNAVAILABLE)
                .data(json!({ "redis": "disconnected", "error": format!("{:#}", e) }))
                .message("Redis connection failed")
        }
    }
}

/// Identifier for this application instance
fn get_instance_identifier() -> String {
    // Docker sets HOSTNAME to the container id
    if let Ok(hostname) = std::env::var("HOSTNAME") {
        if hostname.len() >= 12 && hostname.chars().all(|c: char| c.is_ascii_hexdigit()) {
            return format!("container_{}", &hostname[..12]);
        }
        return format!("host_{}", hostname);
    }

    if let Ok(hostname) = hostname::get() {
        if let Some(hostname_str) = hostname.to_str() {
            return format!("host_{}", hostname_str);
        }
    }

    format!("process_{}", std::process::id())
}
