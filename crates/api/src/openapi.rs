//! OpenAPI documentation configuration.

use crate::error::ErrorResponse;
use crate::handlers;
use crate::models::{
    AnalyticsResponse, HealthResponse, ReportRequest, ReportResponse, SimulateRequest,
    SimulateResponse, StatisticsResponse, StrategyCodeRequest, StrategyCodeResponse,
};
use utoipa::OpenApi;

/// OpenAPI documentation structure.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quanta Simulation API",
        version = "0.1.0",
        description = "Monte Carlo simulation of trading strategy outcomes: sampled value \
                       paths, summary statistics, return distribution, drawdown and \
                       probability cone, plus text report and strategy code exports.",
        license(name = "MIT OR Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Simulation", description = "Monte Carlo simulation"),
        (name = "Export", description = "Downloadable report and strategy code")
    ),
    paths(
        handlers::health_check,
        handlers::run_simulation,
        handlers::export_report,
        handlers::strategy_code,
    ),
    components(
        schemas(
            HealthResponse,
            SimulateRequest,
            SimulateResponse,
            StatisticsResponse,
            AnalyticsResponse,
            ReportRequest,
            ReportResponse,
            StrategyCodeRequest,
            StrategyCodeResponse,
            ErrorResponse,
        )
    )
)]
pub struct ApiDoc;

/// Returns the OpenAPI JSON specification.
#[must_use]
pub fn openapi_json() -> String {
    ApiDoc::openapi().to_pretty_json().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let json = openapi_json();
        assert!(json.contains("Quanta Simulation API"));
        assert!(json.contains("/api/simulate"));
        assert!(json.contains("/api/strategy/code"));
        assert!(json.contains("SimulateRequest"));
    }
}
