//! Request handlers.

use crate::error::{ApiError, ErrorResponse};
use crate::models::{
    HealthResponse, ReportRequest, ReportResponse, SimulateRequest, SimulateResponse,
    StrategyCodeRequest, StrategyCodeResponse,
};
use crate::openapi::ApiDoc;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chrono::Utc;
use quanta_domain::ValidationError;
use quanta_report::{PRODUCT_NAME, ReportFormatter, StrategyCodeArtifact, report_filename};
use tracing::info;
use utoipa::OpenApi;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Runs a Monte Carlo simulation.
#[utoipa::path(
    post,
    path = "/api/simulate",
    tag = "Simulation",
    request_body = SimulateRequest,
    responses(
        (status = 200, description = "Simulation results", body = SimulateResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Numerical failure", body = ErrorResponse),
        (status = 503, description = "Timed out; safe to retry", body = ErrorResponse)
    )
)]
pub async fn run_simulation(
    State(state): State<AppState>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let request = body(payload)?;
    info!(
        ticker = %request.ticker,
        years = request.years,
        simulations = request.num_simulations,
        "Simulation requested"
    );
    Ok(Json(state.backend.simulate(request).await?))
}

/// Runs a simulation and renders the downloadable text report.
#[utoipa::path(
    post,
    path = "/api/report",
    tag = "Export",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Rendered report", body = ReportResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 503, description = "Timed out; safe to retry", body = ErrorResponse)
    )
)]
pub async fn export_report(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<ReportResponse>, ApiError> {
    let request = body(payload)?.simulation.to_domain();
    let outcome = state.service.run(request).await?;
    let now = Utc::now();

    Ok(Json(ReportResponse {
        file_name: report_filename(PRODUCT_NAME, &outcome.request.ticker, now),
        content: ReportFormatter::render_report(
            &outcome.summary,
            &outcome.request,
            &state.rules,
            now,
        ),
    }))
}

/// Returns the default strategy source for a ticker.
#[utoipa::path(
    post,
    path = "/api/strategy/code",
    tag = "Export",
    request_body = StrategyCodeRequest,
    responses(
        (status = 200, description = "Strategy source", body = StrategyCodeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn strategy_code(
    payload: Result<Json<StrategyCodeRequest>, JsonRejection>,
) -> Result<Json<StrategyCodeResponse>, ApiError> {
    let request = body(payload)?;
    let ticker = request.ticker.trim();
    if ticker.is_empty() {
        return Err(ValidationError::Empty { field: "ticker" }.into());
    }
    let artifact = StrategyCodeArtifact::buy_and_hold(ticker, &request.description, Utc::now());
    Ok(Json(StrategyCodeResponse {
        file_name: artifact.file_name,
        code: artifact.code,
    }))
}

/// OpenAPI document.
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
