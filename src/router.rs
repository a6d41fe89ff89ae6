use crate::config::Settings;
use crate::handlers::{
    accounts::{create_account, get_accounts},
    balance_requests::{
        approve_balance_request, create_balance_request, delete_balance_request,
        get_approvers, get_balance_request, get_balance_requests, reject_balance_request,
    },
    health::health_check,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Balance request workflow
        .route("/api/v1/balance-requests", get(get_balance_requests))
        .route("/api/v1/balance-requests", post(create_balance_request))
        .route("/api/v1/balance-requests/:request_id", get(get_balance_request))
        .route("/api/v1/balance-requests/:request_id", delete(delete_balance_request))
        .route("/api/v1/balance-requests/:request_id/approve", post(approve_balance_request))
        .route("/api/v1/balance-requests/:request_id/reject", post(reject_balance_request))
        .route("/api/v1/approvers", get(get_approvers))
        // Account administration
        .route("/api/v1/accounts", get(get_accounts))
        .route("/api/v1/accounts", post(create_account))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // The Prometheus recorder is process global, so tests run without it
    #[cfg(not(test))]
    let router = {
        let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();
        router
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer)
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(settings.request_timeout_secs)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
