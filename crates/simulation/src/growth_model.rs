//! Pluggable growth models that advance a path by one period.

use quanta_domain::{GrowthModelKind, MarketAssumptions};
use rand::Rng;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use std::fmt;

/// Inputs available to a model when producing the value of one period.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// Period being produced (1-based; period 0 is the initial value).
    pub period: usize,
    /// Value at the previous period.
    pub previous: f64,
    /// Value at period 0.
    pub initial: f64,
}

/// Trait for models that advance a simulated value by one period.
///
/// Implementations must draw randomness only from the provided generator so
/// that a seeded path is reproducible regardless of scheduling.
pub trait GrowthModel: Send + Sync + fmt::Debug {
    /// Returns the value at `ctx.period`.
    fn next_value(&self, ctx: &StepContext, rng: &mut StdRng) -> f64;

    /// Short model name for logs.
    fn name(&self) -> &'static str;
}

/// Converts an annual growth rate into the equivalent compounded per-period rate.
#[must_use]
pub fn per_period_growth(annual_growth: f64, periods_per_year: u32) -> f64 {
    (1.0 + annual_growth).powf(1.0 / f64::from(periods_per_year.max(1))) - 1.0
}

/// Log-normal random walk.
///
/// `S(t+1) = S(t) * exp((mu - sigma^2 / 2) * dt + sigma * sqrt(dt) * Z)` with
/// `Z ~ N(0, 1)`.
#[derive(Debug, Clone)]
pub struct GeometricBrownianMotion {
    pub drift: f64,      // annualized drift (mu)
    pub volatility: f64, // annualized volatility (sigma)
    pub time_step: f64,  // time step in years (dt), e.g. 1/12 for monthly
    drift_term: f64,
    vol_term: f64,
}

impl GeometricBrownianMotion {
    pub fn new(drift: f64, volatility: f64, time_step: f64) -> Self {
        Self {
            drift,
            volatility,
            time_step,
            drift_term: (drift - 0.5 * volatility.powi(2)) * time_step,
            vol_term: volatility * time_step.sqrt(),
        }
    }
}

impl GrowthModel for GeometricBrownianMotion {
    fn next_value(&self, ctx: &StepContext, rng: &mut StdRng) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        ctx.previous * (self.drift_term + self.vol_term * z).exp()
    }

    fn name(&self) -> &'static str {
        "geometric_brownian"
    }
}

/// Deterministic compounding trend with a uniform perturbation around it.
///
/// `value_t = trend_t + trend_t * noise_scale * (U - 0.5)` with `U ~ U[0, 1)`
/// and `trend_t = initial * (1 + g)^t`. Each period is drawn independently
/// around the trend rather than from the previous value.
#[derive(Debug, Clone)]
pub struct TrendNoise {
    /// Per-period growth rate g.
    pub growth_per_period: f64,
    /// Volatility coefficient applied to the centered uniform variate.
    pub noise_scale: f64,
}

impl TrendNoise {
    pub fn new(growth_per_period: f64, noise_scale: f64) -> Self {
        Self {
            growth_per_period,
            noise_scale,
        }
    }

    fn trend(&self, ctx: &StepContext) -> f64 {
        ctx.initial * (1.0 + self.growth_per_period).powf(ctx.period as f64)
    }
}

impl GrowthModel for TrendNoise {
    fn next_value(&self, ctx: &StepContext, rng: &mut StdRng) -> f64 {
        let trend = self.trend(ctx);
        let noise = rng.random::<f64>() - 0.5;
        trend + trend * self.noise_scale * noise
    }

    fn name(&self) -> &'static str {
        "trend_noise"
    }
}

/// Compounding at a fixed per-period rate, no randomness.
#[derive(Debug, Clone)]
pub struct DeterministicGrowth {
    /// Per-period growth rate g.
    pub growth_per_period: f64,
}

impl DeterministicGrowth {
    pub fn new(growth_per_period: f64) -> Self {
        Self { growth_per_period }
    }
}

impl GrowthModel for DeterministicGrowth {
    fn next_value(&self, ctx: &StepContext, _rng: &mut StdRng) -> f64 {
        ctx.previous * (1.0 + self.growth_per_period)
    }

    fn name(&self) -> &'static str {
        "deterministic"
    }
}

/// Builds the model selected by `kind`, parameterized by annual assumptions.
#[must_use]
pub fn build_model(
    kind: GrowthModelKind,
    assumptions: MarketAssumptions,
    periods_per_year: u32,
) -> Box<dyn GrowthModel> {
    match kind {
        GrowthModelKind::GeometricBrownian => Box::new(GeometricBrownianMotion::new(
            assumptions.annual_drift,
            assumptions.annual_volatility,
            1.0 / f64::from(periods_per_year.max(1)),
        )),
        GrowthModelKind::TrendNoise => Box::new(TrendNoise::new(
            per_period_growth(assumptions.annual_drift, periods_per_year),
            assumptions.annual_volatility,
        )),
        GrowthModelKind::Deterministic => Box::new(DeterministicGrowth::new(per_period_growth(
            assumptions.annual_drift,
            periods_per_year,
        ))),
    }
}
