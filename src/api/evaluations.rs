use axum::{routing::get, Json, Router};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::schemas::evaluation::{
    EvaluationCreate, EvaluationListQuery, EvaluationReplace, EvaluationResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_evaluations).post(create_evaluation))
        .route(
            "/:evaluation_id",
            get(get_evaluation).put(replace_evaluation).delete(delete_evaluation),
        )
}

async fn create_evaluation(
    state: axum::extract::State<AppState>,
    Json(payload): Json<EvaluationCreate>,
) -> Result<(axum::http::StatusCode, Json<EvaluationResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    {
        let courses = state.courses().read().await;
        if courses.get(&payload.course_id).is_none() {
            return Err(ApiError::NotFound("Course not found".to_string()));
        }
    }

    let evaluation_id = Uuid::new_v4().to_string();
    let evaluation = payload.into_model(evaluation_id.clone());

    let (response, records) = {
        let mut grades = state.grades().write().await;
        if !grades.add(evaluation) {
            return Err(ApiError::BadRequest("Invalid evaluation".to_string()));
        }
        // The manager marks graded evaluations as completed on insert.
        let stored = grades
            .get(&evaluation_id)
            .ok_or_else(|| ApiError::Internal("Evaluation missing after insert".to_string()))?;
        (EvaluationResponse::from_model(stored), grades.records())
    };
    state
        .store()
        .save_evaluations(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save evaluations"))?;

    Ok((axum::http::StatusCode::CREATED, Json(response)))
}

async fn list_evaluations(
    axum::extract::Query(query): axum::extract::Query<EvaluationListQuery>,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<EvaluationResponse>>, ApiError> {
    let grades = state.grades().read().await;
    let response = match query.course_id {
        Some(course_id) => grades
            .list_for_course(&course_id)
            .into_iter()
            .map(EvaluationResponse::from_model)
            .collect(),
        None => grades.records().iter().map(EvaluationResponse::from_model).collect(),
    };
    Ok(Json(response))
}

async fn get_evaluation(
    axum::extract::Path(evaluation_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let grades = state.grades().read().await;
    let evaluation = grades
        .get(&evaluation_id)
        .ok_or_else(|| ApiError::NotFound("Evaluation not found".to_string()))?;
    Ok(Json(EvaluationResponse::from_model(evaluation)))
}

async fn replace_evaluation(
    axum::extract::Path(evaluation_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
    Json(payload): Json<EvaluationReplace>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let (response, records) = {
        let mut grades = state.grades().write().await;
        if grades.get(&evaluation_id).is_none() {
            return Err(ApiError::NotFound("Evaluation not found".to_string()));
        }

        let evaluation = payload.into_model(evaluation_id.clone());
        if !grades.update(evaluation) {
            return Err(ApiError::BadRequest("Invalid evaluation".to_string()));
        }
        // The manager may have adjusted the status to match the grade.
        let stored = grades
            .get(&evaluation_id)
            .ok_or_else(|| ApiError::Internal("Evaluation missing after update".to_string()))?;
        (EvaluationResponse::from_model(stored), grades.records())
    };
    state
        .store()
        .save_evaluations(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save evaluations"))?;

    Ok(Json(response))
}

async fn delete_evaluation(
    axum::extract::Path(evaluation_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let records = {
        let mut grades = state.grades().write().await;
        if !grades.remove(&evaluation_id) {
            return Err(ApiError::NotFound("Evaluation not found".to_string()));
        }
        grades.records()
    };
    state
        .store()
        .save_evaluations(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save evaluations"))?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}
