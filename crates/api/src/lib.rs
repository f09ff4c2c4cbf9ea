//! REST API for the simulation engine.
//!
//! This crate provides:
//! - `POST /api/simulate` with sampled paths and summary statistics
//! - Text report and strategy code exports
//! - Memoization of seeded requests and a hard per-request timeout
//! - A client for running simulations against a remote instance
//! - OpenAPI documentation

/// Simulation backends.
pub mod backend;
/// Outcome cache.
pub mod cache;
/// Remote simulation client.
pub mod client;
/// Server configuration.
pub mod config;
/// Error types.
pub mod error;
/// Request handlers.
pub mod handlers;
/// API request/response models.
pub mod models;
/// OpenAPI documentation.
pub mod openapi;
/// Route definitions.
pub mod routes;
/// Server startup.
pub mod server;
/// Local simulation service.
pub mod service;
/// Application state.
pub mod state;

pub use backend::SimulationBackend;
pub use client::RemoteSimulationClient;
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorResponse};
pub use openapi::ApiDoc;
pub use server::ApiServer;
pub use service::SimulationService;
pub use state::AppState;
