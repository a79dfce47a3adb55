// Unified response system for consistent API responses
// Provides HandlerResponse struct and middleware for standardizing all responses

use axum::{
    body::{self, Body, Bytes},
    http::{
        header::CONTENT_TYPE, HeaderValue, Request, Response,
        response::Parts, StatusCode,
    },
    Json,
    middleware::Next,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{debug, error, warn};
use std::convert::Infallible;
use serde_json::{json, Value};
use serde::{Serialize, Deserialize};
use crate::utils::utils::to_two_space_indented_json;

// Rejection bodies are short plain-text messages
const MAX_PASSTHROUGH_BODY: usize = 64 * 1024;

/// Standard JSON envelope for all API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseFormat {
    pub success: bool,           // true for 2xx
    pub code: u16,               // HTTP status code
    pub status: String,          // HTTP status text (e.g. "OK", "NOT_FOUND")
    pub data: Value,             // Response payload
    pub message: String,         // Human readable summary
    pub date: String,            // ISO timestamp
}

/// Convenience struct for building responses in handlers
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    pub status_code: StatusCode,
    pub data: Value,
    pub message: Option<String>,
}

impl HandlerResponse {
    /// Creates a new response with specified status code
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            data: Value::Null,
            message: None,
        }
    }

    /// Adds JSON data payload to the response
    pub fn data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Sets the message shown in the envelope
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> axum::response::Response {
        let mut response: Response<Body> = Json(json!({
            "data": self.data,
            "message": self.message
        })).into_response();

        *response.status_mut() = self.status_code;

        // Store HandlerResponse in extensions for middleware processing
        response.extensions_mut().insert(self);
        response
    }
}

/// "Payload Too Large" -> "PAYLOAD_TOO_LARGE"
fn format_status(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("UNKNOWN STATUS")
        .to_uppercase()
        .replace(' ', "_")
}

fn default_message(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown status").to_string()
}

/// Builds the envelope from the handler response, or from whatever the
/// router/extractors produced when there is none
async fn extract_response_components(parts: &Parts, body: Body) -> (Value, String) {
    if let Some(r) = parts.extensions.get::<HandlerResponse>() {
        let message: String = r.message.clone().unwrap_or_else(|| default_message(parts.status));
        return (r.data.clone(), message);
    }

    // Extractor rejections carry their reason as plain text
    let bytes: Bytes = match body::to_bytes(body, MAX_PASSTHROUGH_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not read response body for envelope: {}", e);
            Bytes::new()
        }
    };

    let text: String = String::from_utf8_lossy(&bytes).trim().to_string();
    if text.is_empty() {
        (Value::Null, default_message(parts.status))
    } else {
        (Value::Null, text)
    }
}

/// Logs the formatted response with proper JSON indentation
fn log_formatted_response(wrapped: &ResponseFormat) {
    match to_two_space_indented_json(wrapped) {
        Ok(spaced_json) => debug!("\nFinal response:\n{}", spaced_json),
        Err(err) => error!("Failed to format response JSON: {:?}", err),
    }
}

/// Builds the final response with JSON content type
fn build_final_response(parts: Parts, wrapped: &ResponseFormat) -> Response<Body> {
    let json_body: Vec<u8> = serde_json::to_vec(wrapped).unwrap_or_else(|_| b"{}".to_vec());
    let mut new_parts: Parts = parts;

    new_parts.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    new_parts.headers.remove(axum::http::header::CONTENT_LENGTH);

    Response::from_parts(new_parts, Body::from(json_body))
}

/// Middleware that wraps all responses in the standard ResponseFormat structure
pub async fn response_wrapper(
    req: Request<Body>,
    next: Next,
) -> Result<Response<Body>, Infallible> {
    let response: Response<Body> = next.run(req).await;
    let (parts, body) = response.into_parts();

    let (data, message) = extract_response_components(&parts, body).await;

    let wrapped: ResponseFormat = ResponseFormat {
        success: parts.status.is_success(),
        code: parts.status.as_u16(),
        status: format_status(parts.status),
        data,
        message,
        date: Utc::now().to_rfc3339(),
    };

    log_formatted_response(&wrapped);

    Ok(build_final_response(parts, &wrapped))
}
