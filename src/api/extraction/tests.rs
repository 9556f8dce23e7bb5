use axum::http::{Method, StatusCode};
use base64::Engine;
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

fn image() -> String {
    base64::engine::general_purpose::STANDARD.encode(b"not really a photo")
}

#[tokio::test]
async fn evaluation_extraction_without_key_reports_unconfigured() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/extract/evaluation",
            Some(json!({ "image": image(), "hint": "chemistry midterm" })),
        ))
        .await
        .expect("extract evaluation");

    // The collaborator being absent is reported in-band, not as an HTTP error.
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "AI extraction is not configured");
    assert!(body["grade"].is_null());
}

#[tokio::test]
async fn schedule_extraction_without_key_reports_unconfigured() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/extract/schedule",
            Some(json!({ "image": image() })),
        ))
        .await
        .expect("extract schedule");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["entries"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn extraction_rejects_empty_image() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/extract/evaluation",
            Some(json!({ "image": "" })),
        ))
        .await
        .expect("extract evaluation");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn extraction_rejects_invalid_base64() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/extract/evaluation",
            Some(json!({ "image": "%%% not base64 %%%" })),
        ))
        .await
        .expect("extract evaluation");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn extraction_enforces_upload_limit() {
    let ctx = test_support::setup_test_context_with(|| {
        std::env::set_var("MAX_UPLOAD_SIZE_MB", "0");
    })
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/extract/schedule",
            Some(json!({ "image": image() })),
        ))
        .await
        .expect("extract schedule");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
