use axum::{routing::post, Router};
use crate::config::state::AppState;
use super::handler;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/logout", post(handler::logout))
}
