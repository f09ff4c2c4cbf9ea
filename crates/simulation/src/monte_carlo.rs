//! Monte Carlo path generation.
//!
//! Every path owns an independent `StdRng` whose seed is a hash of the base
//! seed and the path index. Paths are generated in parallel without shared
//! RNG state, a seeded request reproduces bit-for-bit regardless of thread
//! scheduling, and neighbouring base seeds produce unrelated samples.

use crate::growth_model::{GrowthModel, StepContext, build_model};
use crate::market::MarketProfile;
use quanta_domain::{
    ComputationError, PathSet, SimulationError, SimulationLimits, SimulationPath,
    SimulationRequest,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Smallest value a path may take; models producing less are clamped here.
///
/// Models bankruptcy as "near zero" so returns and drawdowns stay defined.
pub const VALUE_FLOOR: f64 = 1e-6;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed of the path at `index` for a given base seed.
///
/// The base seed is hashed before the index is folded in, so runs whose
/// seeds differ by a small amount do not share paths.
#[must_use]
pub fn path_seed(base_seed: u64, index: usize) -> u64 {
    let stream = mix64(base_seed.wrapping_add(GOLDEN_GAMMA));
    mix64(stream.wrapping_add((index as u64).wrapping_mul(GOLDEN_GAMMA)))
}

/// Produces `num_simulations` independent value trajectories per request.
#[derive(Debug, Clone, Default)]
pub struct PathGenerator {
    limits: SimulationLimits,
}

impl PathGenerator {
    /// Creates a generator with the default request limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request limits.
    #[must_use]
    pub fn with_limits(mut self, limits: SimulationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Returns the request limits.
    #[must_use]
    pub fn limits(&self) -> &SimulationLimits {
        &self.limits
    }

    /// Generates the path set for `request`.
    ///
    /// Deterministic when the request carries a seed.
    ///
    /// # Errors
    /// Returns a validation error for out-of-bounds requests and a
    /// computation error if a model produces a non-finite value.
    pub fn generate(&self, request: &SimulationRequest) -> Result<PathSet, SimulationError> {
        self.generate_inner(request, None)
    }

    /// Like [`generate`](Self::generate), abandoning work once `deadline` passes.
    ///
    /// # Errors
    /// Additionally fails with [`ComputationError::DeadlineExceeded`].
    pub fn generate_with_deadline(
        &self,
        request: &SimulationRequest,
        deadline: Instant,
    ) -> Result<PathSet, SimulationError> {
        self.generate_inner(request, Some(deadline))
    }

    fn generate_inner(
        &self,
        request: &SimulationRequest,
        deadline: Option<Instant>,
    ) -> Result<PathSet, SimulationError> {
        request.validate(&self.limits)?;

        let assumptions = request
            .assumptions
            .unwrap_or_else(|| MarketProfile::for_ticker(&request.ticker).assumptions);
        let model = build_model(request.model, assumptions, request.periods_per_year);
        let base_seed = request.seed.unwrap_or_else(|| rand::rng().random());

        info!(
            ticker = %request.ticker,
            model = model.name(),
            paths = request.num_simulations,
            periods = request.total_periods(),
            seed = base_seed,
            "Generating simulation paths"
        );

        generate_paths(request, model.as_ref(), base_seed, deadline)
    }
}

/// Generates the paths of `request` with an explicit model and base seed.
///
/// The request is assumed to be validated.
///
/// # Errors
/// Fails on a non-finite model output or when `deadline` passes.
pub fn generate_paths(
    request: &SimulationRequest,
    model: &dyn GrowthModel,
    base_seed: u64,
    deadline: Option<Instant>,
) -> Result<PathSet, SimulationError> {
    let requested = request.num_simulations as usize;
    let periods = request.total_periods();
    let initial = request.initial_investment;
    let completed = AtomicUsize::new(0);

    let paths = (0..requested)
        .into_par_iter()
        .map(|index| {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(ComputationError::DeadlineExceeded {
                    completed: completed.load(Ordering::Relaxed),
                    requested,
                });
            }
            let path = generate_path(model, initial, periods, path_seed(base_seed, index), index)?;
            completed.fetch_add(1, Ordering::Relaxed);
            Ok(path)
        })
        .collect::<Result<Vec<_>, ComputationError>>()
        .inspect_err(|e| warn!(error = %e, "Path generation aborted"))?;

    debug!(paths = paths.len(), "Path generation finished");

    Ok(PathSet::new(initial, request.periods_per_year, paths)?.with_seed(base_seed))
}

/// Generates one path from its own seeded stream.
///
/// # Errors
/// Fails if the model produces NaN or infinity.
pub fn generate_path(
    model: &dyn GrowthModel,
    initial: f64,
    periods: usize,
    seed: u64,
    index: usize,
) -> Result<SimulationPath, ComputationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values = Vec::with_capacity(periods + 1);
    values.push(initial);

    let mut previous = initial;
    for period in 1..=periods {
        let ctx = StepContext {
            period,
            previous,
            initial,
        };
        let value = model.next_value(&ctx, &mut rng);
        if !value.is_finite() {
            return Err(ComputationError::NonFiniteValue {
                path: index,
                period,
            });
        }
        let value = value.max(VALUE_FLOOR);
        values.push(value);
        previous = value;
    }

    Ok(SimulationPath::from_values(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth_model::{DeterministicGrowth, GeometricBrownianMotion};
    use quanta_domain::{GrowthModelKind, MarketAssumptions};
    use std::time::Duration;

    #[derive(Debug)]
    struct Crash;

    impl GrowthModel for Crash {
        fn next_value(&self, ctx: &StepContext, _rng: &mut StdRng) -> f64 {
            ctx.previous - 1_000_000.0
        }

        fn name(&self) -> &'static str {
            "crash"
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl GrowthModel for Broken {
        fn next_value(&self, _ctx: &StepContext, _rng: &mut StdRng) -> f64 {
            f64::NAN
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    fn request() -> SimulationRequest {
        SimulationRequest::new("AAPL", "Buy and hold", 2, 10_000.0, 50).with_seed(99)
    }

    #[test]
    fn test_generate_shape() {
        let set = PathGenerator::new().generate(&request()).unwrap();
        assert_eq!(set.len(), 50);
        assert_eq!(set.seed(), Some(99));
        for path in set.paths() {
            assert_eq!(path.len(), 25);
            assert_eq!(path.initial_value(), Some(10_000.0));
            assert!(path.values().iter().all(|v| *v >= 0.0));
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let generator = PathGenerator::new();
        let a = generator.generate(&request()).unwrap();
        let b = generator.generate(&request()).unwrap();
        assert_eq!(a, b);

        let c = generator.generate(&request().with_seed(100)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_paths_are_independent_streams() {
        let set = PathGenerator::new().generate(&request()).unwrap();
        assert_ne!(set.paths()[0], set.paths()[1]);

        // A path depends only on its own seed, not on its neighbours.
        let a = MarketProfile::for_ticker("AAPL").assumptions;
        let gbm = GeometricBrownianMotion::new(a.annual_drift, a.annual_volatility, 1.0 / 12.0);
        let single = generate_path(&gbm, 10_000.0, 24, path_seed(99, 7), 7).unwrap();
        assert_eq!(&single, &set.paths()[7]);
    }

    #[test]
    fn test_neighbouring_seeds_share_no_paths() {
        let generator = PathGenerator::new();
        let base = SimulationRequest::new("AAPL", "Buy and hold", 5, 10_000.0, 200);
        let a = generator.generate(&base.clone().with_seed(42)).unwrap();
        let b = generator.generate(&base.with_seed(43)).unwrap();

        let shared = a
            .paths()
            .iter()
            .filter(|path| b.paths().contains(*path))
            .count();
        assert_eq!(shared, 0);
    }

    #[test]
    fn test_path_seeds_are_distinct() {
        let mut seeds: Vec<u64> = (0..3)
            .flat_map(|base| (0..1_000).map(move |i| path_seed(base, i)))
            .collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), 3_000);
    }

    #[test]
    fn test_rejects_invalid_request_before_generation() {
        let mut req = request();
        req.years = 0;
        let err = PathGenerator::new().generate(&req).unwrap_err();
        assert!(matches!(err, SimulationError::Validation(_)));

        let mut req = request();
        req.num_simulations = 0;
        assert!(PathGenerator::new().generate(&req).is_err());
    }

    #[test]
    fn test_clamps_to_floor() {
        let path = generate_path(&Crash, 100.0, 3, 0, 0).unwrap();
        assert_eq!(path.values(), &[100.0, VALUE_FLOOR, VALUE_FLOOR, VALUE_FLOOR]);
    }

    #[test]
    fn test_non_finite_is_fatal() {
        let err = generate_path(&Broken, 100.0, 3, 0, 4).unwrap_err();
        assert_eq!(err, ComputationError::NonFiniteValue { path: 4, period: 1 });
    }

    #[test]
    fn test_deadline_in_the_past_aborts() {
        let deadline = Instant::now() - Duration::from_millis(1);
        let err = PathGenerator::new()
            .generate_with_deadline(&request(), deadline)
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Computation(ComputationError::DeadlineExceeded { requested: 50, .. })
        ));
    }

    #[test]
    fn test_flat_model_keeps_initial_value() {
        let req = SimulationRequest::new("AAPL", "Flat", 1, 10_000.0, 1)
            .with_model(GrowthModelKind::Deterministic)
            .with_assumptions(MarketAssumptions::new(0.0, 0.0));
        let set = PathGenerator::new().generate(&req).unwrap();
        assert!(set.paths()[0].values().iter().all(|v| *v == 10_000.0));

        let model = DeterministicGrowth::new(0.0);
        let set = generate_paths(&req, &model, 1, None).unwrap();
        assert_eq!(set.terminal_values(), vec![10_000.0]);
    }
}
