//! HTTP client for a remote simulation service.

use crate::backend::SimulationBackend;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{HealthResponse, SimulateRequest, SimulateResponse};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Calls `/api/simulate` and `/health` on another instance.
///
/// Failures surface as [`ApiError::Upstream`] with the remote status
/// preserved. Nothing is retried here; resubmitting is up to the caller.
#[derive(Debug, Clone)]
pub struct RemoteSimulationClient {
    client: Client,
    base_url: String,
}

impl RemoteSimulationClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:5000`).
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, "Upstream returned an error");
            return Err(ApiError::Upstream {
                status: Some(status.as_u16()),
                message,
            });
        }
        response.json::<T>().await.map_err(upstream)
    }
}

fn upstream(err: reqwest::Error) -> ApiError {
    ApiError::Upstream {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}

#[async_trait]
impl SimulationBackend for RemoteSimulationClient {
    async fn simulate(&self, request: SimulateRequest) -> Result<SimulateResponse, ApiError> {
        let url = self.url("/api/simulate");
        debug!(%url, ticker = %request.ticker, "Forwarding simulation");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(upstream)?;
        Self::decode(response).await
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(upstream)?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use crate::service::SimulationService;
    use crate::state::AppState;
    use axum::http::StatusCode;
    use quanta_simulation::engine::SimulationEngine;
    use tokio::net::TcpListener;

    async fn spawn_server() -> String {
        let service = SimulationService::new(SimulationEngine::new(), 4, Duration::from_secs(30));
        let app = create_router(AppState::new(service));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn request(ticker: &str) -> SimulateRequest {
        SimulateRequest {
            description: "Momentum".into(),
            ticker: ticker.into(),
            years: 1,
            initial_investment: 5_000.0,
            num_simulations: 40,
            periods_per_year: None,
            seed: Some(21),
            model: None,
            include_analytics: false,
        }
    }

    #[test]
    fn test_trims_trailing_slash() {
        let client = RemoteSimulationClient::new("http://host:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://host:5000");
    }

    #[tokio::test]
    async fn test_round_trip_through_server() {
        let client = RemoteSimulationClient::new(spawn_server().await, Duration::from_secs(30)).unwrap();

        assert_eq!(client.health().await.unwrap().status, "healthy");
        let response = client.simulate(request("AAPL")).await.unwrap();
        assert_eq!(response.paths.len(), 13);
        assert_eq!(response.paths[0].values.len(), 10);
        assert_eq!(response.seed, Some(21));
    }

    #[tokio::test]
    async fn test_upstream_status_is_preserved() {
        let client = RemoteSimulationClient::new(spawn_server().await, Duration::from_secs(30)).unwrap();

        let err = client.simulate(request("")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        match err {
            ApiError::Upstream { status, message } => {
                assert_eq!(status, Some(400));
                assert!(message.contains("ticker"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_bad_gateway() {
        let client = RemoteSimulationClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.health().await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.is_retryable());
    }
}
