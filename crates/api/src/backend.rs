//! Abstraction over where simulations run.

use crate::error::ApiError;
use crate::models::{HealthResponse, SimulateRequest, SimulateResponse};
use crate::service::SimulationService;
use async_trait::async_trait;

/// Anything that can answer the simulation contract: the in-process service
/// or a remote instance reached over HTTP.
#[async_trait]
pub trait SimulationBackend: Send + Sync {
    /// Runs one simulation.
    async fn simulate(&self, request: SimulateRequest) -> Result<SimulateResponse, ApiError>;

    /// Reports liveness.
    async fn health(&self) -> Result<HealthResponse, ApiError>;
}

#[async_trait]
impl SimulationBackend for SimulationService {
    async fn simulate(&self, request: SimulateRequest) -> Result<SimulateResponse, ApiError> {
        let outcome = self.run(request.to_domain()).await?;
        Ok(SimulateResponse::from_outcome(
            &outcome,
            self.response_path_limit(),
            request.include_analytics,
        ))
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        Ok(HealthResponse::healthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quanta_simulation::engine::SimulationEngine;
    use std::sync::Arc;
    use std::time::Duration;

    fn backend() -> Arc<dyn SimulationBackend> {
        Arc::new(SimulationService::new(
            SimulationEngine::new(),
            4,
            Duration::from_secs(30),
        ))
    }

    fn request() -> SimulateRequest {
        SimulateRequest {
            description: "Buy and hold".into(),
            ticker: "AAPL".into(),
            years: 2,
            initial_investment: 10_000.0,
            num_simulations: 250,
            periods_per_year: None,
            seed: Some(5),
            model: None,
            include_analytics: false,
        }
    }

    #[tokio::test]
    async fn test_local_backend_samples_paths() {
        let response = backend().simulate(request()).await.unwrap();

        assert_eq!(response.seed, Some(5));
        assert_eq!(response.paths.len(), 25);
        assert!(response.paths.iter().all(|row| row.values.len() == 10));
        assert_eq!(response.paths[0].month, 0);
        assert!(response.paths[0].values.iter().all(|v| *v == 10_000.0));
        assert!(response.analytics.is_none());
    }

    #[tokio::test]
    async fn test_analytics_on_request() {
        let response = backend()
            .simulate(request().with_analytics())
            .await
            .unwrap();
        let analytics = response.analytics.unwrap();
        assert_eq!(analytics.cone.len(), 25);
        assert_eq!(analytics.drawdown.len(), 25);
        assert_eq!(
            analytics.distribution.iter().map(|b| b.frequency).sum::<u32>(),
            250
        );
    }

    #[tokio::test]
    async fn test_small_runs_return_every_path() {
        let mut req = request();
        req.num_simulations = 3;
        let response = backend().simulate(req).await.unwrap();
        assert!(response.paths.iter().all(|row| row.values.len() == 3));
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(backend().health().await.unwrap().status, "healthy");
    }
}
