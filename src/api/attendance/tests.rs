use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

async fn register(
    ctx: &test_support::TestContext,
    course_id: &str,
    date: i64,
    status: &str,
) -> serde_json::Value {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/attendance",
            Some(json!({ "course_id": course_id, "date": date, "status": status })),
        ))
        .await
        .expect("register attendance");

    let code = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(code, StatusCode::CREATED, "response: {body}");
    body
}

#[tokio::test]
async fn register_requires_existing_course() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/attendance",
            Some(json!({ "course_id": "missing", "date": 1_700_000_000, "status": "present" })),
        ))
        .await
        .expect("register attendance");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn register_rejects_non_positive_date() {
    let ctx = test_support::setup_test_context().await;
    let course_id = test_support::create_course(&ctx.app, "General Chemistry", "CHEM-101").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/attendance",
            Some(json!({ "course_id": course_id, "date": 0, "status": "present" })),
        ))
        .await
        .expect("register attendance");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn statistics_ignore_cancelled_classes() {
    let ctx = test_support::setup_test_context().await;
    let course_id = test_support::create_course(&ctx.app, "General Chemistry", "CHEM-101").await;

    register(&ctx, &course_id, 1_700_000_000, "present").await;
    register(&ctx, &course_id, 1_700_086_400, "present").await;
    register(&ctx, &course_id, 1_700_172_800, "absent").await;
    register(&ctx, &course_id, 1_700_259_200, "cancelled_class").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/attendance/statistics/{course_id}"),
            None,
        ))
        .await
        .expect("statistics");

    let stats = test_support::read_json(response).await;
    assert_eq!(stats["countable"], 3);
    assert_eq!(stats["attended"], 2);
    assert_eq!(stats["absences"], 1);
    let percentage = stats["percentage"].as_f64().expect("percentage");
    assert!((percentage - 200.0 / 3.0).abs() < 1e-9, "percentage = {percentage}");
}

#[tokio::test]
async fn statistics_without_records_read_as_full_attendance() {
    let ctx = test_support::setup_test_context().await;
    let course_id = test_support::create_course(&ctx.app, "General Chemistry", "CHEM-101").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/attendance/statistics/{course_id}"),
            None,
        ))
        .await
        .expect("statistics");

    let stats = test_support::read_json(response).await;
    assert_eq!(stats["countable"], 0);
    assert_eq!(stats["percentage"], 100.0);
}

#[tokio::test]
async fn statistics_for_unknown_course_returns_404() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/attendance/statistics/missing",
            None,
        ))
        .await
        .expect("statistics");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_and_delete_record() {
    let ctx = test_support::setup_test_context().await;
    let course_id = test_support::create_course(&ctx.app, "General Chemistry", "CHEM-101").await;

    let created = register(&ctx, &course_id, 1_700_000_000, "absent").await;
    let record_id = created["id"].as_str().expect("record id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/attendance/{record_id}"),
            Some(json!({
                "course_id": course_id, "date": 1_700_000_000, "status": "justified_absence"
            })),
        ))
        .await
        .expect("update attendance");

    let status = response.status();
    let updated = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {updated}");
    assert_eq!(updated["status"], "justified_absence");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/attendance/{record_id}"),
            None,
        ))
        .await
        .expect("delete attendance");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/attendance?course_id={course_id}"),
            None,
        ))
        .await
        .expect("list attendance");
    let listed = test_support::read_json(response).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
}
