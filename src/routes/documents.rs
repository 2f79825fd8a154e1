use axum::{
    extract::{Multipart, State},
    response::Json,
    routing::post,
    Router,
};
use serde_json::Value;
use std::sync::Arc;

use crate::{errors::AppError, AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/process-document", post(process_document))
}

#[utoipa::path(
    post,
    path = "/process-document",
    tag = "documents",
    responses(
        (status = 200, description = "OCR result document with the original filename attached as image_path"),
        (status = 400, description = "No file part in the form, or an empty filename"),
        (status = 500, description = "Staging, engine, or result failure")
    )
)]
pub async fn process_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut upload: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        // Only fields that carry a filename are file parts; a bare form
        // field named "file" does not count.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await?;
        upload = Some((filename, data));
        break;
    }

    let Some((filename, data)) = upload else {
        return Err(AppError::MissingFilePart);
    };
    if filename.is_empty() {
        return Err(AppError::EmptyFilename);
    }

    let document = state.processor.process(&filename, &data).await?;
    Ok(Json(document))
}
