pub(crate) mod api;
pub(crate) mod core;
pub(crate) mod domain;
pub(crate) mod managers;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use crate::core::{config::Settings, state::AppState, telemetry};
use crate::managers::attendance::AttendanceManager;
use crate::managers::courses::CourseRegistry;
use crate::managers::grades::GradeManager;
use crate::managers::schedule::ScheduleRegistry;
use crate::services::store::FileStore;
use crate::services::vision::VisionService;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let store = FileStore::from_settings(&settings).await?;
    let courses = CourseRegistry::from_records(store.load_courses().await?);
    let grades = GradeManager::from_records(store.load_evaluations().await?);
    let attendance = AttendanceManager::from_records(store.load_attendance().await?);
    let schedule = ScheduleRegistry::from_records(store.load_schedule().await?);

    let vision = VisionService::from_settings(&settings)?;
    if vision.is_none() {
        tracing::warn!("No AI API key configured; extraction endpoints are disabled");
    }

    let state =
        AppState::new(settings, store, courses, grades, attendance, schedule, vision);
    let app = api::router::router(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server_host(),
        port = state.settings().server_port(),
        environment = %state.settings().runtime().environment.as_str(),
        "UniTrack API listening"
    );

    axum::serve(listener, app).with_graceful_shutdown(core::shutdown::shutdown_signal()).await?;

    Ok(())
}
