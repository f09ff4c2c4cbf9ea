//! API error type and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quanta_domain::{ComputationError, SimulationError, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Offending request field, for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Whether resubmitting the same request may succeed.
    #[serde(default)]
    pub retryable: bool,
}

/// Errors surfaced by the HTTP layer and by simulation backends.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The request body could not be parsed.
    #[error("malformed request: {0}")]
    BadRequest(String),
    /// The simulation failed numerically.
    #[error(transparent)]
    Computation(#[from] ComputationError),
    /// The simulation did not finish within the configured time.
    #[error("simulation timed out after {secs}s")]
    Timeout {
        /// Configured limit in seconds.
        secs: u64,
    },
    /// A remote simulation service failed.
    #[error("upstream simulation service failed: {message}")]
    Upstream {
        /// HTTP status returned upstream, if any response was received.
        status: Option<u16>,
        /// Upstream error message.
        message: String,
    },
    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<SimulationError> for ApiError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::Validation(e) => Self::Validation(e),
            SimulationError::Computation(e) => Self::Computation(e),
        }
    }
}

impl ApiError {
    /// HTTP status this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Computation(e) if e.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
            Self::Computation(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
        }
    }

    /// Whether the caller may resubmit the same request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Computation(e) => e.is_retryable(),
            Self::Timeout { .. } | Self::Upstream { .. } => true,
            Self::Validation(_) | Self::BadRequest(_) | Self::Internal(_) => false,
        }
    }

    /// Offending request field, for validation failures.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation(e) => Some(e.field()),
            _ => None,
        }
    }

    /// Error body sent to clients.
    #[must_use]
    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            field: self.field().map(str::to_string),
            retryable: self.is_retryable(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(self.to_body())).into_response()
    }
}
