use axum::Router;

use backend_application::AppState;

use crate::handlers::{ops_handlers, upload_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/uploads",
            axum::routing::post(upload_handlers::upload_transactions),
        )
        .route(
            "/v1/ops/uploads",
            axum::routing::get(ops_handlers::list_uploads),
        )
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
