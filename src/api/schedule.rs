use axum::{routing::get, Json, Router};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::schemas::schedule::{ScheduleEntryCreate, ScheduleEntryResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedule).post(create_entry))
        .route("/:entry_id", axum::routing::delete(delete_entry))
}

async fn create_entry(
    state: axum::extract::State<AppState>,
    Json(payload): Json<ScheduleEntryCreate>,
) -> Result<(axum::http::StatusCode, Json<ScheduleEntryResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let entry = payload.into_model(Uuid::new_v4().to_string());
    let response = ScheduleEntryResponse::from_model(&entry);

    let records = {
        let mut schedule = state.schedule().write().await;
        if !schedule.add(entry) {
            return Err(ApiError::BadRequest(
                "Invalid schedule entry: times must be HH:MM with start before end".to_string(),
            ));
        }
        schedule.records()
    };
    state
        .store()
        .save_schedule(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save schedule"))?;

    Ok((axum::http::StatusCode::CREATED, Json(response)))
}

async fn list_schedule(
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<ScheduleEntryResponse>>, ApiError> {
    let schedule = state.schedule().read().await;
    let response = schedule.records().iter().map(ScheduleEntryResponse::from_model).collect();
    Ok(Json(response))
}

async fn delete_entry(
    axum::extract::Path(entry_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let records = {
        let mut schedule = state.schedule().write().await;
        if !schedule.remove(&entry_id) {
            return Err(ApiError::NotFound("Schedule entry not found".to_string()));
        }
        schedule.records()
    };
    state
        .store()
        .save_schedule(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save schedule"))?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}
