//! Summary statistics over a path set.

use crate::drawdown::DrawdownTracker;
use crate::quantile;
use quanta_domain::{PathSet, SimulationPath, StatisticsSummary, TerminalPercentiles};

/// Volatility at or below this is treated as zero when computing the Sharpe ratio.
pub const MIN_VOLATILITY: f64 = 1e-12;

/// Which path(s) the reported maximum drawdown is measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawdownPolicy {
    /// The path whose terminal value ranks at the median index.
    #[default]
    MedianPath,
    /// The single worst drawdown across all paths.
    WorstPath,
    /// Mean of every path's own maximum drawdown.
    AverageOfPaths,
}

/// Derives a [`StatisticsSummary`] from a path set.
///
/// Stateless apart from its configuration: summarizing the same set twice
/// yields identical results.
#[derive(Debug, Clone, Default)]
pub struct StatisticsCalculator {
    risk_free_rate: f64,
    drawdown_policy: DrawdownPolicy,
}

impl StatisticsCalculator {
    /// Creates a calculator with a zero risk-free rate and the median-path drawdown policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the annual risk-free rate used by the Sharpe ratio.
    #[must_use]
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Sets the drawdown policy.
    #[must_use]
    pub fn with_drawdown_policy(mut self, policy: DrawdownPolicy) -> Self {
        self.drawdown_policy = policy;
        self
    }

    /// Returns the drawdown policy.
    #[must_use]
    pub fn drawdown_policy(&self) -> DrawdownPolicy {
        self.drawdown_policy
    }

    /// Summarizes `set`.
    #[must_use]
    pub fn summarize(&self, set: &PathSet) -> StatisticsSummary {
        let initial = set.initial_investment();
        let terminal = set.terminal_values();
        let sorted = quantile::sorted(&terminal);
        let n = sorted.len();

        let median = quantile::median(&sorted);
        let mean = quantile::mean(&terminal);
        let profitable = terminal.iter().filter(|v| **v > initial).count();

        let (annualized_return, volatility) = pooled_return_stats(set);
        let sharpe_ratio = sharpe_ratio(annualized_return, volatility, self.risk_free_rate);

        StatisticsSummary {
            initial_investment: initial,
            num_simulations: n,
            median,
            median_roi: roi_pct(median, initial),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            max: sorted.last().copied().unwrap_or(f64::NAN),
            mean,
            std_dev: quantile::population_std(&terminal),
            mean_roi: roi_pct(mean, initial),
            probability_of_profit: profitable as f64 / n.max(1) as f64 * 100.0,
            annualized_return,
            volatility,
            sharpe_ratio,
            max_drawdown: self.max_drawdown(set),
            percentiles: TerminalPercentiles {
                p5: quantile::percentile(&sorted, 5.0),
                p25: quantile::percentile(&sorted, 25.0),
                p50: median,
                p75: quantile::percentile(&sorted, 75.0),
                p95: quantile::percentile(&sorted, 95.0),
            },
        }
    }

    /// Maximum drawdown in percent according to the configured policy.
    #[must_use]
    pub fn max_drawdown(&self, set: &PathSet) -> f64 {
        match self.drawdown_policy {
            DrawdownPolicy::MedianPath => {
                DrawdownTracker::max_drawdown_of(median_path(set))
            }
            DrawdownPolicy::WorstPath => set
                .paths()
                .iter()
                .map(DrawdownTracker::max_drawdown_of)
                .fold(0.0, f64::min),
            DrawdownPolicy::AverageOfPaths => {
                let per_path: Vec<f64> = set
                    .paths()
                    .iter()
                    .map(DrawdownTracker::max_drawdown_of)
                    .collect();
                quantile::mean(&per_path)
            }
        }
    }

    /// The path the drawdown view is drawn from under the configured policy.
    ///
    /// `AverageOfPaths` has no single path and falls back to the median path.
    #[must_use]
    pub fn representative_path<'a>(&self, set: &'a PathSet) -> &'a SimulationPath {
        match self.drawdown_policy {
            DrawdownPolicy::WorstPath => {
                let mut worst = 0;
                let mut worst_dd = 0.0;
                for (index, path) in set.paths().iter().enumerate() {
                    let dd = DrawdownTracker::max_drawdown_of(path);
                    if dd < worst_dd {
                        worst = index;
                        worst_dd = dd;
                    }
                }
                &set.paths()[worst]
            }
            DrawdownPolicy::MedianPath | DrawdownPolicy::AverageOfPaths => median_path(set),
        }
    }
}

/// Index of the median path: paths ranked by terminal value, element at index
/// `(n - 1) / 2`. Equal terminal values keep generation order, so ties resolve
/// to the lower index.
#[must_use]
pub fn median_path_index(set: &PathSet) -> usize {
    let terminal = set.terminal_values();
    let mut order: Vec<usize> = (0..terminal.len()).collect();
    order.sort_by(|a, b| terminal[*a].total_cmp(&terminal[*b]).then(a.cmp(b)));
    order
        .get(order.len().saturating_sub(1) / 2)
        .copied()
        .unwrap_or(0)
}

/// The median path of `set`.
#[must_use]
pub fn median_path(set: &PathSet) -> &SimulationPath {
    &set.paths()[median_path_index(set)]
}

fn roi_pct(value: f64, initial: f64) -> f64 {
    (value - initial) / initial * 100.0
}

/// Annualized mean and volatility of every period-over-period return of every
/// path, pooled into one sample.
///
/// Single streaming pass (Welford), no intermediate buffer.
fn pooled_return_stats(set: &PathSet) -> (f64, f64) {
    let mut moments = RunningMoments::default();
    for value in set.paths().iter().flat_map(SimulationPath::period_returns) {
        moments.push(value);
    }
    if moments.count == 0 {
        return (0.0, 0.0);
    }
    let periods = f64::from(set.periods_per_year());
    (moments.mean * periods, moments.sample_std() * periods.sqrt())
}

/// Running mean and sum of squared deviations.
#[derive(Debug, Default)]
struct RunningMoments {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningMoments {
    fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    fn sample_std(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        (self.m2 / (self.count - 1) as f64).sqrt()
    }
}

fn sharpe_ratio(annualized_return: f64, volatility: f64, risk_free_rate: f64) -> Option<f64> {
    if !volatility.is_finite() || volatility <= MIN_VOLATILITY {
        return None;
    }
    let ratio = (annualized_return - risk_free_rate) / volatility;
    ratio.is_finite().then_some(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(initial: f64, paths: &[&[f64]]) -> PathSet {
        PathSet::new(
            initial,
            12,
            paths
                .iter()
                .map(|p| SimulationPath::from_values(p.to_vec()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_flat_single_path() {
        let flat = vec![10_000.0; 13];
        let summary = StatisticsCalculator::new().summarize(&set(10_000.0, &[&flat]));

        assert_eq!(summary.median, 10_000.0);
        assert_eq!(summary.median_roi, 0.0);
        assert_eq!(summary.probability_of_profit, 0.0);
        assert_eq!(summary.max_drawdown, 0.0);
        assert_eq!(summary.volatility, 0.0);
        assert_eq!(summary.sharpe_ratio, None);
    }

    #[test]
    fn test_even_count_median() {
        let summary =
            StatisticsCalculator::new().summarize(&set(100.0, &[&[100.0, 100.0], &[100.0, 200.0]]));
        assert_eq!(summary.median, 150.0);
        assert_eq!(summary.median_roi, 50.0);
        assert_eq!(summary.min, 100.0);
        assert_eq!(summary.max, 200.0);
        assert_eq!(summary.probability_of_profit, 50.0);
    }

    #[test]
    fn test_probability_of_profit_is_strict() {
        let summary = StatisticsCalculator::new().summarize(&set(
            100.0,
            &[&[100.0, 100.0], &[100.0, 101.0], &[100.0, 99.0], &[100.0, 150.0]],
        ));
        assert_eq!(summary.probability_of_profit, 50.0);
    }

    #[test]
    fn test_pooled_volatility_and_sharpe() {
        // Returns pooled: +10%, -10%, +10%, -10%.
        let summary = StatisticsCalculator::new().summarize(&set(
            100.0,
            &[&[100.0, 110.0, 99.0], &[100.0, 110.0, 99.0]],
        ));
        let expected_std = (0.04f64 / 3.0).sqrt();
        assert!((summary.volatility - expected_std * 12f64.sqrt()).abs() < 1e-9);
        assert!(summary.annualized_return.abs() < 1e-9);
        assert!(summary.sharpe_ratio.unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_running_moments_match_two_pass() {
        let values = [0.05, -0.02, 0.013, 0.2, -0.15, 0.0, 0.07];
        let mut moments = RunningMoments::default();
        for v in values {
            moments.push(v);
        }
        assert!((moments.mean - quantile::mean(&values)).abs() < 1e-12);
        assert!((moments.sample_std() - quantile::sample_std(&values)).abs() < 1e-12);

        let mut single = RunningMoments::default();
        single.push(0.3);
        assert_eq!(single.sample_std(), 0.0);
    }

    #[test]
    fn test_risk_free_rate_lowers_sharpe() {
        let data = set(100.0, &[&[100.0, 110.0, 104.5], &[100.0, 95.0, 104.5]]);
        let base = StatisticsCalculator::new().summarize(&data).sharpe_ratio.unwrap();
        let with_rf = StatisticsCalculator::new()
            .with_risk_free_rate(0.05)
            .summarize(&data)
            .sharpe_ratio
            .unwrap();
        assert!(with_rf < base);
    }

    #[test]
    fn test_median_path_tie_breaks_to_lower_index() {
        let data = set(
            100.0,
            &[&[100.0, 150.0], &[100.0, 120.0], &[100.0, 120.0], &[100.0, 90.0]],
        );
        // Ranked: 90 (3), 120 (1), 120 (2), 150 (0); median index (4 - 1) / 2 = 1.
        assert_eq!(median_path_index(&data), 1);
    }

    #[test]
    fn test_drawdown_policies() {
        let data = set(
            100.0,
            &[
                &[100.0, 80.0, 120.0],
                &[100.0, 50.0, 110.0],
                &[100.0, 100.0, 100.0],
            ],
        );
        // Median terminal is 110 (path 1).
        let median = StatisticsCalculator::new().summarize(&data);
        assert!((median.max_drawdown - (-50.0)).abs() < 1e-12);

        let worst = StatisticsCalculator::new()
            .with_drawdown_policy(DrawdownPolicy::WorstPath)
            .max_drawdown(&data);
        assert!((worst - (-50.0)).abs() < 1e-12);

        let average = StatisticsCalculator::new()
            .with_drawdown_policy(DrawdownPolicy::AverageOfPaths)
            .max_drawdown(&data);
        assert!((average - (-70.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let data = set(100.0, &[&[100.0, 130.0, 90.0], &[100.0, 70.0, 140.0]]);
        let calc = StatisticsCalculator::new();
        assert_eq!(calc.summarize(&data), calc.summarize(&data));
    }
}
