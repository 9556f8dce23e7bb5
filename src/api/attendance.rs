use axum::{routing::get, Json, Router};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::schemas::attendance::{
    AttendanceCreate, AttendanceListQuery, AttendanceResponse, AttendanceStatsResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendance).post(register_attendance))
        .route("/:record_id", axum::routing::put(update_attendance).delete(delete_attendance))
        .route("/statistics/:course_id", get(attendance_statistics))
}

async fn register_attendance(
    state: axum::extract::State<AppState>,
    Json(payload): Json<AttendanceCreate>,
) -> Result<(axum::http::StatusCode, Json<AttendanceResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    {
        let courses = state.courses().read().await;
        if courses.get(&payload.course_id).is_none() {
            return Err(ApiError::NotFound("Course not found".to_string()));
        }
    }

    let record = payload.into_model(Uuid::new_v4().to_string());
    let response = AttendanceResponse::from_model(&record);

    let records = {
        let mut attendance = state.attendance().write().await;
        if !attendance.register(record) {
            return Err(ApiError::BadRequest("Invalid attendance record".to_string()));
        }
        attendance.records()
    };
    state
        .store()
        .save_attendance(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save attendance"))?;

    Ok((axum::http::StatusCode::CREATED, Json(response)))
}

async fn list_attendance(
    axum::extract::Query(query): axum::extract::Query<AttendanceListQuery>,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    let attendance = state.attendance().read().await;
    let response = match query.course_id {
        Some(course_id) => attendance
            .list_for_course(&course_id)
            .into_iter()
            .map(AttendanceResponse::from_model)
            .collect(),
        None => attendance.records().iter().map(AttendanceResponse::from_model).collect(),
    };
    Ok(Json(response))
}

async fn update_attendance(
    axum::extract::Path(record_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
    Json(payload): Json<AttendanceCreate>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let record = payload.into_model(record_id);
    let response = AttendanceResponse::from_model(&record);

    let records = {
        let mut attendance = state.attendance().write().await;
        if !attendance.update(record) {
            return Err(ApiError::NotFound("Attendance record not found".to_string()));
        }
        attendance.records()
    };
    state
        .store()
        .save_attendance(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save attendance"))?;

    Ok(Json(response))
}

async fn delete_attendance(
    axum::extract::Path(record_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let records = {
        let mut attendance = state.attendance().write().await;
        if !attendance.remove(&record_id) {
            return Err(ApiError::NotFound("Attendance record not found".to_string()));
        }
        attendance.records()
    };
    state
        .store()
        .save_attendance(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save attendance"))?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn attendance_statistics(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<Json<AttendanceStatsResponse>, ApiError> {
    {
        let courses = state.courses().read().await;
        if courses.get(&course_id).is_none() {
            return Err(ApiError::NotFound("Course not found".to_string()));
        }
    }

    let attendance = state.attendance().read().await;
    let stats = attendance.statistics(&course_id);
    Ok(Json(AttendanceStatsResponse::from_stats(course_id, stats)))
}

#[cfg(test)]
mod tests;
