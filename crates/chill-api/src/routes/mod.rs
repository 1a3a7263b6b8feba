//! Route definitions
//!
//! Resource routes are mounted under /api/v1. Health and docs routes are
//! exported separately so they can bypass rate limiting.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{health, messages, rooms, upload};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Multipart framing allowance on top of the upload size limit
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the API router (excluding health and docs)
pub fn create_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes(max_upload_bytes))
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Swagger UI at /api/docs, document at /api-docs/openapi.json
pub fn docs_routes() -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

fn api_v1_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(room_routes())
        .merge(upload_routes(max_upload_bytes))
}

/// Room directory and message history
fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/rooms/:room_id", get(rooms::get_room))
        .route("/rooms/:room_id/messages", get(messages::list_messages))
        .route(
            "/rooms/:room_id/messages/:message_id",
            delete(messages::delete_message),
        )
}

/// Image upload
fn upload_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload/image", post(upload::upload_image))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
}
