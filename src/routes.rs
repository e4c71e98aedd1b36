//! HTTP route definitions.

use axum::extract::DefaultBodyLimit;
use axum::routing::any;
use axum::Router;

use crate::handlers;
use crate::AppState;

/// Create the file-management routes.
///
/// Routes are registered method-agnostic: the handlers never inspect the
/// method, and any verb reaches them. Oversized upload bodies fail inside the
/// multipart extractor and surface as form-parse errors.
pub fn file_routes(max_body_size: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", any(handlers::upload_image))
        .route("/list", any(handlers::list_images))
        .route("/download", any(handlers::download_image))
        .route("/delete", any(handlers::delete_image))
        .layer(DefaultBodyLimit::max(max_body_size))
}
