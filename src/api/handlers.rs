use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::collections::HashMap;

use crate::core::metrics;
use crate::core::state::AppState;
use crate::schemas::{HealthResponse, RootResponse};

pub(crate) async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let response = RootResponse {
        message: state.settings().api().project_name.clone(),
        version: state.settings().api().version.clone(),
    };

    Json(response)
}

pub(crate) async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut status = "healthy".to_string();
    let mut components = HashMap::new();

    if state.store().is_writable().await {
        components.insert("storage".to_string(), "healthy".to_string());
    } else {
        components.insert("storage".to_string(), "unhealthy: data directory not writable".to_string());
        status = "unhealthy".to_string();
    }

    // The vision collaborator is optional; absence is reported, not degraded.
    let vision = if state.vision().is_some() { "configured" } else { "disabled" };
    components.insert("vision".to_string(), vision.to_string());

    Json(HealthResponse { service: "unitrack-api".to_string(), status, components })
}

pub(crate) async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    if !state.settings().telemetry().prometheus_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    match metrics::render() {
        Some(body) => ([(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
