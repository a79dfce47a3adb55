// Placeholder resource route definitions

use axum::{
    extract::Extension,
    routing::get,
    Router,
};

use crate::config::state::AppState;
use super::catalog::{ResourceDescriptor, RESOURCES};
use super::handler;

/// Mounts the five CRUD routes of one resource under `/api/<path>`
fn routes_for(resource: &'static ResourceDescriptor) -> Router<AppState> {
    let collection: String = format!("/api/{}", resource.path);
    let item: String = format!("/api/{}/{{id}}", resource.path);

    Router::new()
        .route(&collection, get(handler::list_handler).post(handler::create_handler))
        .route(
            &item,
            get(handler::get_handler)
                .put(handler::update_handler)
                .delete(handler::delete_handler),
        )
        .layer(Extension(resource))
}

/// Creates router with the placeholder endpoints of every resource
pub fn resource_routes() -> Router<AppState> {
    RESOURCES
        .iter()
        .fold(Router::new(), |router, resource| router.merge(routes_for(resource)))
}
