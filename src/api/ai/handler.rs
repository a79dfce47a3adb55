// AI chat and content-generation handlers

use serde_json::json;
use axum::{extract::State, http::StatusCode, Json};
use tracing::{instrument, info, error};

use crate::config::state::AppState;
use crate::services::ai::{AiError, AiReply, ChatRequest, ContentRequest};
use crate::utils::response_handler::HandlerResponse;

/// Forwards a chat message to the AI service (Ollama as fallback)
#[instrument(name = "ai_chat", skip_all)]
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> HandlerResponse {
    info!("Forwarding chat message ({} history entries)", request.history.len());

    match state.ai.chat(&request).await {
        Ok(reply) => success(reply, "Chat reply generated"),
        Err(e) => failure(e, "Chat request failed"),
    }
}

/// Forwards a teaching-content generation request
#[instrument(name = "ai_generate", skip_all, fields(content_type = %request.content_type))]
pub async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<ContentRequest>,
) -> HandlerResponse {
    info!("Forwarding content generation for topic '{}'", request.topic);

    match state.ai.generate_content(&request).await {
        Ok(reply) => success(reply, "Content generated"),
        Err(e) => failure(e, "Content generation failed"),
    }
}

fn success(reply: AiReply, message: &str) -> HandlerResponse {
    let message: String = if reply.mocked {
        format!("{message} (reply looks templated)")
    } else {
        message.to_string()
    };

    HandlerResponse::new(StatusCode::OK)
        .data(json!(reply))
        .message(message)
}

fn failure(err: AiError, message: &str) -> HandlerResponse {
    match err {
        AiError::Validation { message: reason } => HandlerResponse::new(StatusCode::BAD_REQUEST)
            .data(json!({ "error": reason }))
            .message("Invalid AI request"),
        other => {
            error!("{}: {}", message, other);
            HandlerResponse::new(StatusCode::BAD_GATEWAY)
                .data(json!({
                    "error": "ai_unavailable",
                    "details": other.to_string()
                }))
                .message(message)
        }
    }
}
