//! Route definitions.

use crate::config::DEFAULT_FRONTEND_URL;
use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Builds the application router.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/simulate", post(handlers::run_simulation))
        .route("/report", post(handlers::export_report))
        .route("/strategy/code", post(handlers::strategy_code));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api-docs/openapi.json", get(handlers::openapi_spec))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy admitting the configured frontend and the local dev server.
pub fn cors_layer(frontend_url: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = [frontend_url, DEFAULT_FRONTEND_URL]
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin.trim_end_matches('/'))
                .inspect_err(|_| warn!(%origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
