use axum::body::Body;
use axum::http::StatusCode;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

use suryad::ocr::SuryaOcr;
use suryad::test_helpers::{
    create_test_config, multipart_upload_request, test_app, FailingOcrEngine, SilentOcrEngine,
    WritingOcrEngine,
};

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn dir_is_empty(path: &std::path::Path) -> bool {
    std::fs::read_dir(path).unwrap().next().is_none()
}

#[tokio::test]
async fn successful_upload_returns_the_enriched_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let document = json!({
        "text_lines": [{"text": "Total: 42.00", "bbox": [10, 10, 200, 30]}],
        "languages": ["en"]
    });
    let app = test_app(
        &config,
        Arc::new(WritingOcrEngine::new(&config, document.clone())),
    )
    .await;

    let response = app
        .oneshot(multipart_upload_request(
            "/process-document",
            "file",
            Some("invoice.png"),
            b"png-bytes",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let mut expected = document;
    expected["image_path"] = json!("invoice.png");
    assert_eq!(body_json(response).await, expected);

    // The staged upload is gone, the display copy is retained.
    assert!(!dir.path().join("uploads/invoice.png").exists());
    assert_eq!(
        std::fs::read(dir.path().join("static/images/invoice.png")).unwrap(),
        b"png-bytes"
    );
}

#[tokio::test]
async fn request_without_a_file_part_is_rejected_with_400() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let app = test_app(&config, Arc::new(SilentOcrEngine)).await;

    let response = app
        .oneshot(multipart_upload_request(
            "/process-document",
            "attachment",
            Some("invoice.png"),
            b"png-bytes",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "No file provided"}));

    // Nothing was written to any storage root.
    assert!(dir_is_empty(&dir.path().join("uploads")));
    assert!(dir_is_empty(&dir.path().join("static/images")));
}

#[tokio::test]
async fn bare_form_field_named_file_is_not_a_file_part() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let app = test_app(&config, Arc::new(SilentOcrEngine)).await;

    let response = app
        .oneshot(multipart_upload_request(
            "/process-document",
            "file",
            None,
            b"just a value",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "No file provided"}));
}

#[tokio::test]
async fn empty_filename_is_rejected_with_400() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let app = test_app(&config, Arc::new(SilentOcrEngine)).await;

    let response = app
        .oneshot(multipart_upload_request(
            "/process-document",
            "file",
            Some(""),
            b"png-bytes",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "No file selected"}));
    assert!(dir_is_empty(&dir.path().join("uploads")));
    assert!(dir_is_empty(&dir.path().join("static/images")));
}

#[tokio::test]
async fn engine_failure_returns_500_and_cleans_up_staging() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let app = test_app(&config, Arc::new(FailingOcrEngine)).await;

    let response = app
        .oneshot(multipart_upload_request(
            "/process-document",
            "file",
            Some("scan.png"),
            b"payload",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("mock-ocr"));

    // Staged upload removed, display copy kept.
    assert!(!dir.path().join("uploads/scan.png").exists());
    assert!(dir.path().join("static/images/scan.png").exists());
}

#[tokio::test]
async fn real_subprocess_engine_failure_surfaces_as_500() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    // `false` exits non-zero without touching the result tree.
    let app = test_app(&config, Arc::new(SuryaOcr::new("false".to_string()))).await;

    let response = app
        .oneshot(multipart_upload_request(
            "/process-document",
            "file",
            Some("scan.png"),
            b"payload",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!dir.path().join("uploads/scan.png").exists());
}

#[tokio::test]
async fn missing_result_file_returns_500_referencing_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let app = test_app(&config, Arc::new(SilentOcrEngine)).await;

    let response = app
        .oneshot(multipart_upload_request(
            "/process-document",
            "file",
            Some("scan.png"),
            b"payload",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("not found"));
    assert!(!dir.path().join("uploads/scan.png").exists());
}

#[tokio::test]
async fn reuploading_a_filename_overwrites_the_display_copy() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let document = json!({"text_lines": []});
    let app = test_app(
        &config,
        Arc::new(WritingOcrEngine::new(&config, document)),
    )
    .await;

    let first = app
        .clone()
        .oneshot(multipart_upload_request(
            "/process-document",
            "file",
            Some("page.png"),
            b"first payload",
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(multipart_upload_request(
            "/process-document",
            "file",
            Some("page.png"),
            b"second payload",
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    assert_eq!(
        std::fs::read(dir.path().join("static/images/page.png")).unwrap(),
        b"second payload"
    );
}

#[tokio::test]
async fn multi_dot_filenames_keep_their_inner_dots_in_the_result_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let document = json!({"text_lines": []});
    let app = test_app(
        &config,
        Arc::new(WritingOcrEngine::new(&config, document)),
    )
    .await;

    let response = app
        .oneshot(multipart_upload_request(
            "/process-document",
            "file",
            Some("scan.page1.png"),
            b"payload",
        ))
        .await
        .unwrap();

    // Only the final extension is stripped when deriving the result
    // directory; an engine that splits on the first dot would mismatch
    // here and surface as a not-found failure instead.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["image_path"], "scan.page1.png");
    assert!(dir
        .path()
        .join("results/surya/scan.page1/results.json")
        .exists());
}
