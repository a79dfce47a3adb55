use std::collections::HashMap;

use axum::{extract::State, http::{HeaderMap, StatusCode, header::AUTHORIZATION}, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::state::AppState;
use crate::utils::response_handler::HandlerResponse;

const ROLES: &[&str] = &["student", "teacher", "admin"];
const USERNAME_MAX: usize = 50;
const USERNAME_MIN: usize = 3;
const PASSWORD_MIN: usize = 6;
// bcrypt ignores everything past the first 72 bytes
const PASSWORD_MAX_BYTES: usize = 72;

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    pub role: String,
    pub expires_in: u64,
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Checks a registration payload, returning the normalized username and role
pub fn validate_registration(request: &RegisterRequest) -> Result<(String, String), String> {
    let username: String = request.username.trim().to_lowercase();

    if username.len() < USERNAME_MIN || username.len() > USERNAME_MAX {
        return Err(format!("username must be {USERNAME_MIN}-{USERNAME_MAX} characters"));
    }

    if !username.chars().all(|c: char| c.is_ascii_alphanumeric() || c == '_') {
        return Err("username can only contain letters, digits and underscores".to_string());
    }

    if request.password.chars().count() < PASSWORD_MIN {
        return Err(format!("password must be at least {PASSWORD_MIN} characters"));
    }

    if request.password.len() > PASSWORD_MAX_BYTES {
        return Err(format!("password cannot exceed {PASSWORD_MAX_BYTES} bytes"));
    }

    let role: String = request.role.as_deref().unwrap_or("student").trim().to_lowercase();
    if !ROLES.contains(&role.as_str()) {
        return Err(format!("role must be one of: {}", ROLES.join(", ")));
    }

    Ok((username, role))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn cache_unavailable(e: anyhow::Error) -> HandlerResponse {
    error!("Cache operation failed: {:#}", e);
    HandlerResponse::new(StatusCode::SERVICE_UNAVAILABLE)
        .message("Cache unavailable")
        .data(json!({ "error": "cache_unavailable" }))
}

fn duplicate_username() -> HandlerResponse {
    HandlerResponse::new(StatusCode::CONFLICT)
        .message("Username already registered")
        .data(json!({ "error": "duplicate_username" }))
}

fn invalid_credentials() -> HandlerResponse {
    HandlerResponse::new(StatusCode::UNAUTHORIZED)
        .message("Invalid credentials")
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Registers a user, storing the bcrypt hash in Redis
#[instrument(skip_all, fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> HandlerResponse {
    // 1. Validate
    let (username, role) = match validate_registration(&payload) {
        Ok(valid) => valid,
        Err(reason) => {
            return HandlerResponse::new(StatusCode::BAD_REQUEST)
                .message("Invalid registration data")
                .data(json!({ "error": reason }));
        }
    };

    let user_key: String = state.redis.key(&format!("user:{username}"));

    // 2. Reject obvious duplicates before paying for bcrypt
    match state.redis.exists(&user_key).await {
        Ok(true) => return duplicate_username(),
        Ok(false) => {}
        Err(e) => return cache_unavailable(e),
    }

    // 3. Hash Password
    let password_hash: String = match state.passwords.hash(&payload.password).await {
        Ok(h) => h,
        Err(e) => {
            error!("Password hashing failed: {:#}", e);
            return HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .message("Failed to process password");
        }
    };

    // 4. Claim the username. HSETNX is atomic, so of two concurrent
    //    registrations exactly one gets here.
    let user_id: String = Uuid::new_v4().to_string();
    match state.redis.hsetnx(&user_key, "id", &user_id).await {
        Ok(true) => {}
        Ok(false) => return duplicate_username(),
        Err(e) => return cache_unavailable(e),
    }

    // 5. Store the remaining fields
    let created_at: String = Utc::now().to_rfc3339();
    let fields: [(&str, &str); 4] = [
        ("username", username.as_str()),
        ("role", role.as_str()),
        ("password_hash", password_hash.as_str()),
        ("created_at", created_at.as_str()),
    ];

    if let Err(e) = state.redis.hset_multiple(&user_key, &fields).await {
        // Release the claim so the username can be registered again
        if let Err(release) = state.redis.del(&user_key).await {
            warn!("Failed to release claim on {}: {:#}", username, release);
        }
        return cache_unavailable(e);
    }

    if let Err(e) = state.redis.lpush(&state.redis.key("users"), &username).await {
        // The user record is already stored, the index is best effort
        warn!("Failed to index user {}: {:#}", username, e);
    }

    info!("Registered user {} as {}", username, role);

    HandlerResponse::new(StatusCode::CREATED)
        .message("User registered successfully")
        .data(json!({ "user_id": user_id, "username": username, "role": role }))
}

/// Verifies credentials and opens a session in Redis
#[instrument(skip_all, fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> HandlerResponse {
    let username: String = payload.username.trim().to_lowercase();
    if username.is_empty() || payload.password.is_empty() {
        return HandlerResponse::new(StatusCode::BAD_REQUEST)
            .message("Username and password are required");
    }

    // 1. Fetch user
    let user_key: String = state.redis.key(&format!("user:{username}"));
    let user: HashMap<String, String> = match state.redis.hgetall(&user_key).await {
        Ok(user) => user,
        Err(e) => return cache_unavailable(e),
    };

    let (Some(user_id), Some(stored_hash)) = (user.get("id"), user.get("password_hash")) else {
        return invalid_credentials();
    };

    // 2. Verify Password
    match state.passwords.verify(&payload.password, stored_hash).await {
        Ok(true) => {}
        Ok(false) => return invalid_credentials(),
        Err(e) => {
            error!("Stored hash for {} is unusable: {:#}", username, e);
            return invalid_credentials();
        }
    }

    // 3. Open session
    let role: String = user.get("role").cloned().unwrap_or_else(|| "student".to_string());
    let token: String = Uuid::new_v4().to_string();
    let ttl: u64 = state.environment.session_ttl_seconds;
    let session: String = json!({
        "user_id": user_id,
        "username": username,
        "role": role,
    })
    .to_string();

    if let Err(e) = state.redis.set_ex(&state.redis.key(&format!("session:{token}")), &session, ttl).await {
        return cache_unavailable(e);
    }

    info!("User {} logged in", username);

    HandlerResponse::new(StatusCode::OK)
        .message("Login successful")
        .data(json!(AuthResponse {
            token,
            user_id: user_id.clone(),
            role,
            expires_in: ttl,
        }))
}

/// Deletes the session named by the bearer token
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResponse {
    let Some(token) = bearer_token(&headers) else {
        return HandlerResponse::new(StatusCode::UNAUTHORIZED)
            .message("Missing bearer token");
    };

    match state.redis.del(&state.redis.key(&format!("session:{token}"))).await {
        Ok(0) => HandlerResponse::new(StatusCode::UNAUTHORIZED)
            .message("Invalid or expired session"),
        Ok(_) => HandlerResponse::new(StatusCode::OK)
            .message("Logged out"),
        Err(e) => cache_unavailable(e),
    }
}
