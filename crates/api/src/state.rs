//! Shared application state.

use crate::backend::SimulationBackend;
use crate::service::SimulationService;
use quanta_report::InterpretationRules;
use std::sync::Arc;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// In-process simulation service; reports are always computed locally.
    pub service: SimulationService,
    /// Backend answering `/api/simulate`.
    pub backend: Arc<dyn SimulationBackend>,
    /// Thresholds used when rendering reports.
    pub rules: InterpretationRules,
}

impl AppState {
    /// Creates state whose simulate endpoint is served by `service` itself.
    #[must_use]
    pub fn new(service: SimulationService) -> Self {
        Self {
            backend: Arc::new(service.clone()),
            service,
            rules: InterpretationRules::default(),
        }
    }

    /// Serves `/api/simulate` from a different backend.
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn SimulationBackend>) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: InterpretationRules) -> Self {
        self.rules = rules;
        self
    }
}
