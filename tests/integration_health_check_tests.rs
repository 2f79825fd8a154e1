use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

use suryad::test_helpers::{create_test_config, test_app, SilentOcrEngine};

#[tokio::test]
async fn test_health_endpoint_responds() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let app = test_app(&config, Arc::new(SilentOcrEngine)).await;

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "Health endpoint should return 200 OK");

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok", "Health status should be 'ok'");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(dir.path());
    let app = test_app(&config, Arc::new(SilentOcrEngine)).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["paths"].get("/process-document").is_some());
    assert!(body["paths"].get("/images/{filename}").is_some());
}
