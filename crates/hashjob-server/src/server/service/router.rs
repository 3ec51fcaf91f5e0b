use super::{
    error::ApiError,
    handler::{AppState, get_hash, get_stats, missing_job_id, submit_hash},
};
use crate::server::telemetry::{increment_rejections, record_request_duration};
use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::time::Instant;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the HTTP router with all routes and middleware.
///
/// Unsupported methods on a known route get axum's 405. Once the coordinator
/// starts draining, every request is answered with 403 before it reaches a
/// handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/hash", post(submit_hash).get(missing_job_id))
        .route("/hash/", get(missing_job_id))
        .route("/hash/{id}", get(get_hash))
        .route("/stats", get(get_stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            reject_when_draining,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn reject_when_draining(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.coordinator.shutdown_state().is_draining() {
        increment_rejections();
        #[cfg(feature = "tracing")]
        tracing::debug!("Rejecting {} {} while draining", request.method(), request.uri());
        return ApiError::Forbidden.into_response();
    }

    let start = Instant::now();
    let response = next.run(request).await;
    record_request_duration(start.elapsed().as_secs_f64() * 1_000.0);
    response
}
