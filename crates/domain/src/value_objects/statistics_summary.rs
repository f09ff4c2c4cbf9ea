use serde::{Deserialize, Serialize};

/// Percentiles of the terminal value distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalPercentiles {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

/// Summary statistics derived once from a path set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    /// Starting capital of every path.
    pub initial_investment: f64,
    /// Number of paths summarized.
    pub num_simulations: usize,
    /// Median terminal value.
    pub median: f64,
    /// ROI of the median terminal value, in percent.
    pub median_roi: f64,
    /// Smallest terminal value.
    pub min: f64,
    /// Largest terminal value.
    pub max: f64,
    /// Mean terminal value.
    pub mean: f64,
    /// Population standard deviation of terminal values.
    pub std_dev: f64,
    /// Mean terminal ROI, in percent.
    pub mean_roi: f64,
    /// Share of paths ending strictly above the initial investment, in percent.
    pub probability_of_profit: f64,
    /// Annualized mean of pooled per-period returns.
    pub annualized_return: f64,
    /// Annualized standard deviation of pooled per-period returns.
    pub volatility: f64,
    /// Excess return over volatility; `None` when volatility is zero.
    pub sharpe_ratio: Option<f64>,
    /// Most negative drawdown of the representative path, in percent.
    pub max_drawdown: f64,
    /// Terminal value percentiles.
    pub percentiles: TerminalPercentiles,
}

impl StatisticsSummary {
    /// Whether the Sharpe ratio could be computed.
    #[must_use]
    pub fn has_sharpe_ratio(&self) -> bool {
        self.sharpe_ratio.is_some()
    }
}
