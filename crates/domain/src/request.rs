//! Simulation requests and their validation limits.

use crate::error::ValidationError;
use crate::value_objects::MarketAssumptions;
use serde::{Deserialize, Serialize};

/// Default number of periods simulated per year (monthly granularity).
pub const DEFAULT_PERIODS_PER_YEAR: u32 = 12;

/// Default cap on the number of simulated values per request. Fits the
/// largest monthly request (20 years of 10 000 paths) with room to spare.
pub const DEFAULT_MAX_TOTAL_STEPS: u64 = 5_000_000;

/// Which growth model drives path generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthModelKind {
    /// Log-normal random walk with Gaussian shocks.
    #[default]
    GeometricBrownian,
    /// Compounding trend with a uniform-centered perturbation around it.
    TrendNoise,
    /// Compounding trend without noise.
    Deterministic,
}

/// Bounds applied to a [`SimulationRequest`] before generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationLimits {
    /// Minimum projection horizon in years.
    pub min_years: u32,
    /// Maximum projection horizon in years.
    pub max_years: u32,
    /// Minimum number of paths.
    pub min_simulations: u32,
    /// Maximum number of paths.
    pub max_simulations: u32,
    /// Maximum periods per year.
    pub max_periods_per_year: u32,
    /// Maximum `years * periods_per_year * num_simulations` of one request.
    pub max_total_steps: u64,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            min_years: 1,
            max_years: 20,
            min_simulations: 1,
            max_simulations: 10_000,
            max_periods_per_year: 365,
            max_total_steps: DEFAULT_MAX_TOTAL_STEPS,
        }
    }
}

/// Immutable input of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Asset symbol.
    pub ticker: String,
    /// Free-text strategy description.
    pub strategy_description: String,
    /// Projection horizon in years.
    pub years: u32,
    /// Starting capital.
    pub initial_investment: f64,
    /// Number of paths to generate.
    pub num_simulations: u32,
    /// Period granularity.
    pub periods_per_year: u32,
    /// Seed for reproducible generation (None = process-wide random source).
    pub seed: Option<u64>,
    /// Growth model.
    pub model: GrowthModelKind,
    /// Overrides the ticker's default market assumptions.
    pub assumptions: Option<MarketAssumptions>,
}

impl SimulationRequest {
    /// Creates a new request with monthly periods, no seed and the default model.
    pub fn new(
        ticker: impl Into<String>,
        strategy_description: impl Into<String>,
        years: u32,
        initial_investment: f64,
        num_simulations: u32,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            strategy_description: strategy_description.into(),
            years,
            initial_investment,
            num_simulations,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            seed: None,
            model: GrowthModelKind::default(),
            assumptions: None,
        }
    }

    /// Sets the period granularity.
    #[must_use]
    pub fn with_periods_per_year(mut self, periods_per_year: u32) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    /// Sets the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the growth model.
    #[must_use]
    pub fn with_model(mut self, model: GrowthModelKind) -> Self {
        self.model = model;
        self
    }

    /// Overrides the market assumptions.
    #[must_use]
    pub fn with_assumptions(mut self, assumptions: MarketAssumptions) -> Self {
        self.assumptions = Some(assumptions);
        self
    }

    /// Number of periods each path advances.
    #[must_use]
    pub fn total_periods(&self) -> usize {
        self.years as usize * self.periods_per_year as usize
    }

    /// Number of values in each generated path (periods plus the initial value).
    #[must_use]
    pub fn path_length(&self) -> usize {
        self.total_periods() + 1
    }

    /// Checks the request against the given limits.
    ///
    /// # Errors
    /// Returns the first offending field.
    pub fn validate(&self, limits: &SimulationLimits) -> Result<(), ValidationError> {
        if self.ticker.trim().is_empty() {
            return Err(ValidationError::Empty { field: "ticker" });
        }
        check_range("years", self.years, limits.min_years, limits.max_years)?;
        check_range(
            "num_simulations",
            self.num_simulations,
            limits.min_simulations,
            limits.max_simulations,
        )?;
        check_range(
            "periods_per_year",
            self.periods_per_year,
            1,
            limits.max_periods_per_year,
        )?;
        let periods = self.total_periods() as u64;
        if periods * u64::from(self.num_simulations) > limits.max_total_steps {
            let allowed = (limits.max_total_steps / periods).min(u64::from(limits.max_simulations));
            return Err(ValidationError::OutOfRange {
                field: "num_simulations",
                value: u64::from(self.num_simulations),
                min: u64::from(limits.min_simulations),
                max: allowed,
            });
        }
        if !self.initial_investment.is_finite() || self.initial_investment <= 0.0 {
            return Err(ValidationError::NotPositive {
                field: "initial_investment",
                value: self.initial_investment,
            });
        }
        if let Some(assumptions) = &self.assumptions {
            assumptions.validate()?;
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value: u64::from(value),
            min: u64::from(min),
            max: u64::from(max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SimulationRequest {
        SimulationRequest::new("AAPL", "Buy and hold", 5, 10_000.0, 1_000)
    }

    #[test]
    fn test_defaults_and_lengths() {
        let req = request();
        assert_eq!(req.periods_per_year, 12);
        assert_eq!(req.total_periods(), 60);
        assert_eq!(req.path_length(), 61);
        assert_eq!(req.model, GrowthModelKind::GeometricBrownian);
        assert!(req.validate(&SimulationLimits::default()).is_ok());
    }

    #[test]
    fn test_rejects_zero_years() {
        let mut req = request();
        req.years = 0;
        let err = req.validate(&SimulationLimits::default()).unwrap_err();
        assert_eq!(err.field(), "years");
    }

    #[test]
    fn test_rejects_zero_simulations() {
        let mut req = request();
        req.num_simulations = 0;
        let err = req.validate(&SimulationLimits::default()).unwrap_err();
        assert_eq!(err.field(), "num_simulations");
    }

    #[test]
    fn test_rejects_too_many_simulations() {
        let mut req = request();
        req.num_simulations = 10_001;
        let err = req.validate(&SimulationLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                field: "num_simulations",
                max: 10_000,
                ..
            }
        ));
    }

    #[test]
    fn test_total_steps_are_bounded() {
        let limits = SimulationLimits::default();
        let req = SimulationRequest::new("AAPL", "Daily rebalance", 20, 10_000.0, 10_000)
            .with_periods_per_year(365);
        let err = req.validate(&limits).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "num_simulations",
                value: 10_000,
                min: 1,
                max: 684,
            }
        );

        let monthly = SimulationRequest::new("AAPL", "Buy and hold", 20, 10_000.0, 10_000);
        assert!(monthly.validate(&limits).is_ok());
        assert!(req.clone().with_periods_per_year(12).validate(&limits).is_ok());
    }

    #[test]
    fn test_rejects_blank_ticker() {
        let mut req = request();
        req.ticker = "   ".to_string();
        let err = req.validate(&SimulationLimits::default()).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "ticker" });
    }

    #[test]
    fn test_rejects_non_positive_investment() {
        let mut req = request();
        req.initial_investment = 0.0;
        assert_eq!(
            req.validate(&SimulationLimits::default())
                .unwrap_err()
                .field(),
            "initial_investment"
        );

        req.initial_investment = f64::NAN;
        assert!(req.validate(&SimulationLimits::default()).is_err());
    }

    #[test]
    fn test_rejects_bad_assumptions() {
        let req = request().with_assumptions(MarketAssumptions::new(0.05, -0.1));
        let err = req.validate(&SimulationLimits::default()).unwrap_err();
        assert_eq!(err.field(), "annual_volatility");
    }

    #[test]
    fn test_model_kind_serde() {
        let json = serde_json::to_string(&GrowthModelKind::TrendNoise).unwrap();
        assert_eq!(json, "\"trend_noise\"");
        let kind: GrowthModelKind = serde_json::from_str("\"deterministic\"").unwrap();
        assert_eq!(kind, GrowthModelKind::Deterministic);
    }
}
