//! Server startup.

use crate::config::ServerConfig;
use crate::routes::{cors_layer, create_router};
use crate::service::SimulationService;
use crate::state::AppState;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

/// HTTP server for the simulation API.
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Creates a server whose state is derived from `config`.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let state = AppState::new(SimulationService::from_config(&config));
        Self { config, state }
    }

    /// Replaces the application state.
    #[must_use]
    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Full router including the CORS policy.
    pub fn router(&self) -> Router {
        create_router(self.state.clone()).layer(cors_layer(&self.config.frontend_url))
    }

    /// Binds and serves until Ctrl-C.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound or the server fails.
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.config.addr();
        let app = self.router();
        let listener = TcpListener::bind(addr).await?;
        info!(
            %addr,
            timeout_secs = self.config.timeout.as_secs(),
            cache_capacity = self.config.cache_capacity,
            "Simulation API listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                tokio::signal::ctrl_c().await.ok();
                info!("Shutting down");
            })
            .await
    }
}
