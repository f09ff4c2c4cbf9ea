use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Baseline growth and risk assumptions for an asset, both annualized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketAssumptions {
    /// Expected annual return (mu), e.g. 0.08 for 8%.
    pub annual_drift: f64,
    /// Annual volatility (sigma), e.g. 0.2 for 20%.
    pub annual_volatility: f64,
}

impl MarketAssumptions {
    pub fn new(annual_drift: f64, annual_volatility: f64) -> Self {
        Self {
            annual_drift,
            annual_volatility,
        }
    }

    /// Builds annualized assumptions from daily return statistics.
    #[must_use]
    pub fn from_daily(daily_mean: f64, daily_std: f64, trading_days: f64) -> Self {
        Self {
            annual_drift: daily_mean * trading_days,
            annual_volatility: daily_std * trading_days.sqrt(),
        }
    }

    /// Checks that both figures are usable.
    ///
    /// # Errors
    /// Fails on a non-finite drift or a negative / non-finite volatility.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.annual_drift.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "annual_drift",
                value: self.annual_drift,
            });
        }
        if !self.annual_volatility.is_finite() || self.annual_volatility < 0.0 {
            return Err(ValidationError::NotPositive {
                field: "annual_volatility",
                value: self.annual_volatility,
            });
        }
        Ok(())
    }
}
