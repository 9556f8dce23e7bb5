use axum::{routing::post, Json, Router};
use base64::Engine;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::schemas::extraction::{
    EvaluationExtractionResponse, ExtractionRequest, ScheduleExtractionResponse,
};

const NOT_CONFIGURED: &str = "AI extraction is not configured";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/evaluation", post(extract_evaluation))
        .route("/schedule", post(extract_schedule))
}

async fn extract_evaluation(
    state: axum::extract::State<AppState>,
    Json(payload): Json<ExtractionRequest>,
) -> Result<Json<EvaluationExtractionResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    check_image(&state, &payload.image)?;
    metrics::counter!("extraction_requests_total", "kind" => "evaluation").increment(1);

    let Some(vision) = state.vision() else {
        return Ok(Json(EvaluationExtractionResponse::failure(NOT_CONFIGURED.to_string())));
    };

    match vision.scan_evaluation(&payload.image, payload.hint.as_deref()).await {
        Ok(scan) => Ok(Json(EvaluationExtractionResponse::from_scan(scan))),
        Err(err) => {
            tracing::warn!(error = %err, kind = "evaluation", "Extraction failed");
            Ok(Json(EvaluationExtractionResponse::failure(err.to_string())))
        }
    }
}

async fn extract_schedule(
    state: axum::extract::State<AppState>,
    Json(payload): Json<ExtractionRequest>,
) -> Result<Json<ScheduleExtractionResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    check_image(&state, &payload.image)?;
    metrics::counter!("extraction_requests_total", "kind" => "schedule").increment(1);

    let Some(vision) = state.vision() else {
        return Ok(Json(ScheduleExtractionResponse::failure(NOT_CONFIGURED.to_string())));
    };

    match vision.scan_schedule(&payload.image).await {
        Ok(scan) => Ok(Json(ScheduleExtractionResponse::from_scan(scan))),
        Err(err) => {
            tracing::warn!(error = %err, kind = "schedule", "Extraction failed");
            Ok(Json(ScheduleExtractionResponse::failure(err.to_string())))
        }
    }
}

/// Rejects payloads that are not base64 or decode past the upload cap before
/// anything is sent upstream.
fn check_image(state: &AppState, image: &str) -> Result<(), ApiError> {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(image)
        .map_err(|_| ApiError::BadRequest("image must be valid base64".to_string()))?;

    let limit = state.settings().max_upload_size_bytes();
    if decoded.len() > limit {
        return Err(ApiError::BadRequest(format!(
            "image exceeds the {} MB upload limit",
            state.settings().storage().max_upload_size_mb
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests;
