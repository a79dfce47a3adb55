// Placeholder CRUD handlers shared by every education resource

use serde_json::{json, Value};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use tracing::{instrument, info};

use crate::utils::response_handler::HandlerResponse;
use super::catalog::ResourceDescriptor;

type Resource = Extension<&'static ResourceDescriptor>;

/// Lists the resource. Always empty.
#[instrument(skip_all, fields(resource = resource.path))]
pub async fn list_handler(Extension(resource): Resource) -> HandlerResponse {
    info!("Listing {}", resource.path);

    HandlerResponse::new(StatusCode::OK)
        .data(json!([]))
        .message(format!("{} list retrieved", resource.label))
}

#[instrument(skip_all, fields(resource = resource.path, id = %id))]
pub async fn get_handler(
    Extension(resource): Resource,
    Path(id): Path<String>,
) -> HandlerResponse {
    info!("Fetching {} {}", resource.path, id);

    HandlerResponse::new(StatusCode::OK)
        .data(json!({}))
        .message(format!("{} details retrieved", resource.singular))
}

/// Accepts any JSON object; nothing is stored
#[instrument(skip_all, fields(resource = resource.path))]
pub async fn create_handler(
    Extension(resource): Resource,
    Json(_payload): Json<Value>,
) -> HandlerResponse {
    info!("Creating {}", resource.path);

    HandlerResponse::new(StatusCode::CREATED)
        .data(json!({}))
        .message(format!("{} created successfully", resource.singular))
}

#[instrument(skip_all, fields(resource = resource.path, id = %id))]
pub async fn update_handler(
    Extension(resource): Resource,
    Path(id): Path<String>,
    Json(_payload): Json<Value>,
) -> HandlerResponse {
    info!("Updating {} {}", resource.path, id);

    HandlerResponse::new(StatusCode::OK)
        .data(json!({}))
        .message(format!("{} updated successfully", resource.singular))
}

#[instrument(skip_all, fields(resource = resource.path, id = %id))]
pub async fn delete_handler(
    Extension(resource): Resource,
    Path(id): Path<String>,
) -> HandlerResponse {
    info!("Deleting {} {}", resource.path, id);

    HandlerResponse::new(StatusCode::OK)
        .message(format!("{} deleted successfully", resource.singular))
}
