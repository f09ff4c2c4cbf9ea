use serde::{Deserialize, Serialize};

/// Quantile bands of all paths at one period.
///
/// Ordering invariant: `lower95 <= lower75 <= mean <= upper75 <= upper95`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityConePoint {
    /// Period index.
    pub period: usize,
    /// Cross-sectional mean.
    pub mean: f64,
    /// Upper bound of the 95% band.
    pub upper95: f64,
    /// Upper bound of the 75% band.
    pub upper75: f64,
    /// Lower bound of the 75% band.
    pub lower75: f64,
    /// Lower bound of the 95% band.
    pub lower95: f64,
}

impl ProbabilityConePoint {
    /// Checks the quantile ordering invariant.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.lower95 <= self.lower75
            && self.lower75 <= self.mean
            && self.mean <= self.upper75
            && self.upper75 <= self.upper95
    }
}
