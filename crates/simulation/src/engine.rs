//! Simulation orchestration: validate, generate, analyze.

use crate::cone::{ConeMethod, ProbabilityConeBuilder};
use crate::distribution::{DEFAULT_BUCKET_WIDTH_PCT, DistributionBinner};
use crate::drawdown::DrawdownTracker;
use crate::monte_carlo::PathGenerator;
use crate::statistics::{DrawdownPolicy, StatisticsCalculator};
use quanta_domain::{
    ComputationError, DistributionBin, DrawdownPoint, PathSet, ProbabilityConePoint,
    SimulationError, SimulationLimits, SimulationRequest, StatisticsSummary,
};
use std::time::Instant;
use tracing::{debug, info_span, warn};

/// Everything derived from one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    /// The request that produced this outcome.
    pub request: SimulationRequest,
    /// Raw paths.
    pub path_set: PathSet,
    /// Summary statistics.
    pub summary: StatisticsSummary,
    /// Terminal ROI histogram.
    pub distribution: Vec<DistributionBin>,
    /// Drawdown history of the representative path.
    pub drawdown: Vec<DrawdownPoint>,
    /// Quantile bands per period.
    pub cone: Vec<ProbabilityConePoint>,
}

impl SimulationOutcome {
    /// Seed the paths were generated from.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.path_set.seed()
    }
}

/// Runs a request end to end.
///
/// The four derived views only read the path set, so they are computed
/// concurrently once generation is done.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    generator: PathGenerator,
    calculator: StatisticsCalculator,
    cone_builder: ProbabilityConeBuilder,
    bucket_width: f64,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self {
            generator: PathGenerator::default(),
            calculator: StatisticsCalculator::default(),
            cone_builder: ProbabilityConeBuilder::default(),
            bucket_width: DEFAULT_BUCKET_WIDTH_PCT,
        }
    }
}

impl SimulationEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limits(mut self, limits: SimulationLimits) -> Self {
        self.generator = self.generator.with_limits(limits);
        self
    }

    #[must_use]
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.calculator = self.calculator.with_risk_free_rate(rate);
        self
    }

    #[must_use]
    pub fn with_drawdown_policy(mut self, policy: DrawdownPolicy) -> Self {
        self.calculator = self.calculator.with_drawdown_policy(policy);
        self
    }

    #[must_use]
    pub fn with_cone_method(mut self, method: ConeMethod) -> Self {
        self.cone_builder = ProbabilityConeBuilder::new(method);
        self
    }

    /// Sets the histogram bucket width in ROI percentage points.
    #[must_use]
    pub fn with_bucket_width(mut self, width: f64) -> Self {
        self.bucket_width = width;
        self
    }

    #[must_use]
    pub fn limits(&self) -> &SimulationLimits {
        self.generator.limits()
    }

    /// Runs `request` to completion.
    ///
    /// # Errors
    /// Validation errors for out-of-bounds requests or bucket widths,
    /// computation errors for numeric failures during generation.
    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationOutcome, SimulationError> {
        let span = info_span!("simulation", ticker = %request.ticker);
        let _guard = span.enter();
        let set = self.generator.generate(request)?;
        self.analyze(request.clone(), set)
    }

    /// Like [`run`](Self::run), giving up once `deadline` passes.
    ///
    /// # Errors
    /// Additionally fails with a retryable deadline error.
    pub fn run_with_deadline(
        &self,
        request: &SimulationRequest,
        deadline: Instant,
    ) -> Result<SimulationOutcome, SimulationError> {
        let span = info_span!("simulation", ticker = %request.ticker);
        let _guard = span.enter();
        let set = self.generator.generate_with_deadline(request, deadline)?;
        self.analyze_inner(request.clone(), set, Some(deadline))
    }

    /// Derives every view from an already generated path set.
    ///
    /// # Errors
    /// Fails if the configured bucket width is invalid for this set.
    pub fn analyze(
        &self,
        request: SimulationRequest,
        path_set: PathSet,
    ) -> Result<SimulationOutcome, SimulationError> {
        self.analyze_inner(request, path_set, None)
    }

    /// Like [`analyze`](Self::analyze), failing once `deadline` passes.
    ///
    /// The deadline is checked before the views are computed and again once
    /// they are done.
    ///
    /// # Errors
    /// Additionally fails with [`ComputationError::DeadlineExceeded`].
    pub fn analyze_with_deadline(
        &self,
        request: SimulationRequest,
        path_set: PathSet,
        deadline: Instant,
    ) -> Result<SimulationOutcome, SimulationError> {
        self.analyze_inner(request, path_set, Some(deadline))
    }

    fn analyze_inner(
        &self,
        request: SimulationRequest,
        path_set: PathSet,
        deadline: Option<Instant>,
    ) -> Result<SimulationOutcome, SimulationError> {
        check_deadline(deadline, &path_set)?;
        let started = Instant::now();
        let ((summary, distribution), (drawdown, cone)) = rayon::join(
            || {
                rayon::join(
                    || self.calculator.summarize(&path_set),
                    || DistributionBinner::bin(&path_set, self.bucket_width),
                )
            },
            || {
                rayon::join(
                    || DrawdownTracker::track(self.calculator.representative_path(&path_set)),
                    || self.cone_builder.build_cone(&path_set),
                )
            },
        );
        let distribution = distribution?;
        check_deadline(deadline, &path_set)?;

        debug!(
            paths = path_set.len(),
            buckets = distribution.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis finished"
        );

        Ok(SimulationOutcome {
            request,
            path_set,
            summary,
            distribution,
            drawdown,
            cone,
        })
    }
}

fn check_deadline(deadline: Option<Instant>, path_set: &PathSet) -> Result<(), ComputationError> {
    if deadline.is_some_and(|d| Instant::now() >= d) {
        warn!(paths = path_set.len(), "Analysis abandoned at deadline");
        return Err(ComputationError::DeadlineExceeded {
            completed: path_set.len(),
            requested: path_set.len(),
        });
    }
    Ok(())
}
