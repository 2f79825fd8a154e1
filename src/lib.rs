pub mod config;
pub mod errors;
pub mod ocr;
pub mod routes;
pub mod services;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;

#[cfg(test)]
mod tests;

use axum::{extract::DefaultBodyLimit, response::Json, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::config::Config;
use crate::services::processor::DocumentProcessor;
use crate::storage::StorageLayout;

/// Shared per-process state. The storage layout and processor are created
/// once at startup and reused by every request.
pub struct AppState {
    pub config: Config,
    pub storage: Arc<StorageLayout>,
    pub processor: DocumentProcessor,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::documents::process_document,
        routes::images::serve_image,
        routes::health::health_check,
    ),
    tags(
        (name = "documents", description = "Document ingestion and OCR orchestration"),
        (name = "images", description = "Stored display copies"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Assemble the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::documents::router())
        .merge(routes::images::router())
        .merge(routes::health::router())
        .route("/api-docs/openapi.json", get(openapi_spec))
        // Uploads are not size-limited.
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
