use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::api;
use crate::core::{config::Settings, state::AppState};
use crate::managers::attendance::AttendanceManager;
use crate::managers::courses::CourseRegistry;
use crate::managers::grades::GradeManager;
use crate::managers::schedule::ScheduleRegistry;
use crate::services::store::FileStore;
use crate::services::vision::VisionService;

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    data_dir: PathBuf,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() -> PathBuf {
    let data_dir = std::env::temp_dir().join(format!("unitrack-test-{}", Uuid::new_v4()));

    std::env::set_var("UNITRACK_ENV", "test");
    std::env::set_var("UNITRACK_STRICT_CONFIG", "0");
    std::env::set_var("DATA_DIR", &data_dir);
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::remove_var("OPENAI_API_KEY");
    std::env::remove_var("BACKEND_CORS_ORIGINS");
    std::env::remove_var("MAX_UPLOAD_SIZE_MB");
    std::env::remove_var("DEFAULT_MIN_ATTENDANCE");
    std::env::remove_var("DEFAULT_MIN_GRADE");

    data_dir
}

pub(crate) async fn setup_test_context() -> TestContext {
    setup_test_context_with(|| ()).await
}

/// Builds a context with extra env tweaks applied after the test defaults.
pub(crate) async fn setup_test_context_with(customize: impl FnOnce()) -> TestContext {
    let guard = env_lock().await;
    let data_dir = set_test_env();
    customize();

    let settings = Settings::load().expect("settings");
    let store = FileStore::from_settings(&settings).await.expect("file store");
    let vision = VisionService::from_settings(&settings).expect("vision settings");

    let state = AppState::new(
        settings,
        store,
        CourseRegistry::default(),
        GradeManager::default(),
        AttendanceManager::default(),
        ScheduleRegistry::default(),
        vision,
    );
    let app = api::router::router(state.clone());

    TestContext { state, app, data_dir, _guard: guard }
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}

pub(crate) async fn create_course(app: &Router, name: &str, code: &str) -> String {
    let response = tower::ServiceExt::oneshot(
        app.clone(),
        json_request(
            Method::POST,
            "/api/v1/courses",
            Some(serde_json::json!({ "name": name, "code": code })),
        ),
    )
    .await
    .expect("create course");

    let status = response.status();
    let created = read_json(response).await;
    assert_eq!(status, axum::http::StatusCode::CREATED, "response: {created}");
    created["id"].as_str().expect("course id").to_string()
}
