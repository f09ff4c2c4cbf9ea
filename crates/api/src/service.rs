//! Local simulation service: validation, memoization and hard timeout.

use crate::cache::{CacheKey, SimulationCache};
use crate::config::ServerConfig;
use crate::error::ApiError;
use quanta_domain::SimulationRequest;
use quanta_simulation::engine::{SimulationEngine, SimulationOutcome};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Runs simulations on a blocking worker with an upper bound on wall time.
///
/// Every computation is abandoned at the deadline; the caller sees a
/// retryable timeout and may resubmit.
#[derive(Clone)]
pub struct SimulationService {
    engine: Arc<SimulationEngine>,
    cache: Arc<SimulationCache>,
    timeout: Duration,
    response_path_limit: usize,
}

impl SimulationService {
    #[must_use]
    pub fn new(engine: SimulationEngine, cache_capacity: usize, timeout: Duration) -> Self {
        Self {
            engine: Arc::new(engine),
            cache: Arc::new(SimulationCache::new(cache_capacity)),
            timeout,
            response_path_limit: crate::config::DEFAULT_RESPONSE_PATHS,
        }
    }

    /// Builds the service described by `config`.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let engine = SimulationEngine::new().with_risk_free_rate(config.risk_free_rate);
        Self::new(engine, config.cache_capacity, config.timeout)
            .with_response_path_limit(config.response_path_limit)
    }

    #[must_use]
    pub fn with_response_path_limit(mut self, limit: usize) -> Self {
        self.response_path_limit = limit;
        self
    }

    #[must_use]
    pub fn response_path_limit(&self) -> usize {
        self.response_path_limit
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn cache(&self) -> &SimulationCache {
        &self.cache
    }

    /// Runs `request`, serving seeded repeats from the cache.
    ///
    /// # Errors
    /// Validation errors before any work starts, computation errors from the
    /// engine and [`ApiError::Timeout`] once the configured limit passes.
    pub async fn run(&self, request: SimulationRequest) -> Result<Arc<SimulationOutcome>, ApiError> {
        request.validate(self.engine.limits())?;

        let key = CacheKey::for_request(&request);
        if let Some(key) = &key
            && let Some(hit) = self.cache.get(key).await
        {
            debug!(ticker = %request.ticker, "Serving cached simulation");
            return Ok(hit);
        }

        let started = Instant::now();
        let deadline = started + self.timeout;
        let engine = Arc::clone(&self.engine);
        let ticker = request.ticker.clone();
        let task = tokio::task::spawn_blocking(move || engine.run_with_deadline(&request, deadline));

        let outcome = match tokio::time::timeout(self.timeout, task).await {
            Err(_) => {
                warn!(ticker = %ticker, timeout_secs = self.timeout.as_secs(), "Simulation timed out");
                return Err(ApiError::Timeout {
                    secs: self.timeout.as_secs(),
                });
            }
            Ok(Err(join)) => return Err(ApiError::Internal(join.to_string())),
            Ok(Ok(result)) => Arc::new(result?),
        };

        info!(
            ticker = %ticker,
            paths = outcome.path_set.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Simulation completed"
        );

        Ok(match key {
            Some(key) => self.cache.insert(key, outcome).await,
            None => outcome,
        })
    }
}
