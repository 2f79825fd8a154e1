use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    // Wildcard segment: display copies are keyed by the original filename,
    // which may contain slashes.
    Router::new().route("/images/{*filename}", get(serve_image))
}

#[utoipa::path(
    get,
    path = "/images/{filename}",
    tag = "images",
    params(
        ("filename" = String, Path, description = "Original filename of the display copy")
    ),
    responses(
        (status = 200, description = "Raw bytes of the stored display copy"),
        (status = 404, description = "No display copy stored under that filename")
    )
)]
pub async fn serve_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    match state.storage.read_display(&filename).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&filename).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], bytes).into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!(filename = %filename, "failed to read display copy: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
