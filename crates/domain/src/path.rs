//! Simulated value trajectories.
//!
//! A [`SimulationPath`] is one trajectory of portfolio value over time; a
//! [`PathSet`] is the ensemble generated for one request. Both are immutable
//! once built, so every analytics pass can read them concurrently.

use crate::error::ComputationError;

/// One simulated trajectory: `values[t]` is the portfolio value at period `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPath {
    values: Vec<f64>,
}

impl SimulationPath {
    /// Wraps a sequence of values.
    #[must_use]
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// All values, initial value first.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of values including the initial one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the path holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at period 0.
    #[must_use]
    pub fn initial_value(&self) -> Option<f64> {
        self.values.first().copied()
    }

    /// Value at the final period.
    #[must_use]
    pub fn terminal_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// `(period index, value)` pairs in order.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().copied().enumerate()
    }

    /// Period-over-period simple returns.
    pub fn period_returns(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.windows(2).map(|w| w[1] / w[0] - 1.0)
    }
}

/// All paths generated for one request, in generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSet {
    initial_investment: f64,
    periods_per_year: u32,
    seed: Option<u64>,
    paths: Vec<SimulationPath>,
}

impl PathSet {
    /// Builds a path set, checking the structural invariants.
    ///
    /// # Errors
    /// Fails when the set is empty, lengths differ, a path does not start at
    /// `initial_investment`, or any value is negative or non-finite.
    pub fn new(
        initial_investment: f64,
        periods_per_year: u32,
        paths: Vec<SimulationPath>,
    ) -> Result<Self, ComputationError> {
        let expected = paths.first().ok_or(ComputationError::EmptyPathSet)?.len();

        for (index, path) in paths.iter().enumerate() {
            if path.is_empty() {
                return Err(ComputationError::EmptyPath { path: index });
            }
            if path.len() != expected {
                return Err(ComputationError::InconsistentPathLength {
                    path: index,
                    expected,
                    actual: path.len(),
                });
            }
            let start = path.values[0];
            if start != initial_investment {
                return Err(ComputationError::InitialValueMismatch {
                    path: index,
                    expected: initial_investment,
                    actual: start,
                });
            }
            for (period, value) in path.points() {
                if !value.is_finite() {
                    return Err(ComputationError::NonFiniteValue {
                        path: index,
                        period,
                    });
                }
                if value < 0.0 {
                    return Err(ComputationError::NegativeValue {
                        path: index,
                        period,
                        value,
                    });
                }
            }
        }

        Ok(Self {
            initial_investment,
            periods_per_year,
            seed: None,
            paths,
        })
    }

    /// Records the base seed the set was generated from.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Starting capital shared by all paths.
    #[must_use]
    pub fn initial_investment(&self) -> f64 {
        self.initial_investment
    }

    /// Period granularity.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }

    /// Base seed, when known.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Paths in generation order.
    #[must_use]
    pub fn paths(&self) -> &[SimulationPath] {
        &self.paths
    }

    /// Number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false for a constructed set; kept for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Values per path (periods plus the initial value).
    #[must_use]
    pub fn path_length(&self) -> usize {
        self.paths.first().map_or(0, SimulationPath::len)
    }

    /// Terminal value of every path, in generation order.
    #[must_use]
    pub fn terminal_values(&self) -> Vec<f64> {
        self.paths
            .iter()
            .filter_map(SimulationPath::terminal_value)
            .collect()
    }

    /// Terminal ROI in percent of every path, in generation order.
    #[must_use]
    pub fn terminal_roi_pct(&self) -> Vec<f64> {
        self.terminal_values()
            .into_iter()
            .map(|v| (v - self.initial_investment) / self.initial_investment * 100.0)
            .collect()
    }

    /// Values of all paths at one period.
    #[must_use]
    pub fn cross_section(&self, period: usize) -> Vec<f64> {
        self.paths
            .iter()
            .filter_map(|p| p.values.get(period).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(values: &[f64]) -> SimulationPath {
        SimulationPath::from_values(values.to_vec())
    }

    #[test]
    fn test_path_accessors() {
        let p = path(&[100.0, 110.0, 99.0]);
        assert_eq!(p.len(), 3);
        assert_eq!(p.initial_value(), Some(100.0));
        assert_eq!(p.terminal_value(), Some(99.0));

        let returns: Vec<f64> = p.period_returns().collect();
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] - (99.0 / 110.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_path_set_terminal_values() {
        let set = PathSet::new(
            100.0,
            12,
            vec![path(&[100.0, 150.0]), path(&[100.0, 50.0])],
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.path_length(), 2);
        assert_eq!(set.terminal_values(), vec![150.0, 50.0]);
        assert_eq!(set.terminal_roi_pct(), vec![50.0, -50.0]);
        assert_eq!(set.cross_section(0), vec![100.0, 100.0]);
    }

    #[test]
    fn test_path_set_rejects_empty() {
        assert_eq!(
            PathSet::new(100.0, 12, vec![]).unwrap_err(),
            ComputationError::EmptyPathSet
        );
    }

    #[test]
    fn test_path_set_rejects_mismatched_lengths() {
        let err = PathSet::new(
            100.0,
            12,
            vec![path(&[100.0, 101.0]), path(&[100.0, 101.0, 102.0])],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ComputationError::InconsistentPathLength { path: 1, .. }
        ));
    }

    #[test]
    fn test_path_set_rejects_wrong_start() {
        let err = PathSet::new(100.0, 12, vec![path(&[90.0, 101.0])]).unwrap_err();
        assert!(matches!(err, ComputationError::InitialValueMismatch { .. }));
    }

    #[test]
    fn test_path_set_rejects_negative_values() {
        let err = PathSet::new(100.0, 12, vec![path(&[100.0, -1.0])]).unwrap_err();
        assert!(matches!(
            err,
            ComputationError::NegativeValue { period: 1, .. }
        ));

        let err = PathSet::new(100.0, 12, vec![path(&[100.0, f64::NAN])]).unwrap_err();
        assert!(matches!(err, ComputationError::NonFiniteValue { .. }));
    }
}
