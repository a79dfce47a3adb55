// AI forwarding route definitions

use axum::{routing::post, Router};

use crate::config::state::AppState;
use super::handler;

pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ai/chat", post(handler::chat_handler))
        .route("/api/ai/generate", post(handler::generate_handler))
}
