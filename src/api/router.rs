use axum::{
    http::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
    http::{HeaderName, Method, Request, Response},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::NormalizePathLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::api::attendance;
use crate::api::courses;
use crate::api::evaluations;
use crate::api::extraction;
use crate::api::handlers;
use crate::api::schedule;
use crate::core::{config::Settings, state::AppState};

pub(crate) fn router(state: AppState) -> Router {
    let cors = build_cors_layer(state.settings());
    let api_v1_prefix = state.settings().api().api_v1_str.clone();
    let api_v1 = Router::new()
        .nest("/courses", courses::router())
        .nest("/evaluations", evaluations::router())
        .nest("/attendance", attendance::router())
        .nest("/schedule", schedule::router())
        .nest("/extract", extraction::router());

    let request_id_header = HeaderName::from_static("x-request-id");
    let request_id_header_for_span = request_id_header.clone();
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(move |request: &Request<_>| {
            let request_id = request
                .headers()
                .get(&request_id_header_for_span)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_response(|response: &Response<axum::body::Body>, latency: Duration, _span: &Span| {
            let status_label = response.status().as_u16().to_string();
            metrics::counter!(
                "http_requests_total",
                "status" => status_label.clone()
            )
            .increment(1);
            metrics::histogram!(
                "http_request_duration_seconds",
                "status" => status_label
            )
            .record(latency.as_secs_f64());
        });

    let mut router: Router<AppState> = Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz).head(handlers::healthz))
        .nest(&api_v1_prefix, api_v1)
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(trace_layer)
        .layer(cors);

    if state.settings().telemetry().prometheus_enabled {
        router = router.route("/metrics", get(handlers::metrics));
    }

    router.with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins = settings
        .cors()
        .origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            ACCEPT,
            ORIGIN,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        // Wildcard origin cannot be combined with allow_credentials
        base.allow_origin(Any)
    } else {
        base.allow_credentials(true)
            .allow_origin(AllowOrigin::list(origins))
    }
}
