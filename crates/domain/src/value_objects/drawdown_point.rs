use serde::{Deserialize, Serialize};

/// Decline from the running peak at one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    /// Period index.
    pub period: usize,
    /// Drawdown in percent; never positive, zero at a new peak.
    pub drawdown_pct: f64,
}

impl DrawdownPoint {
    pub fn new(period: usize, drawdown_pct: f64) -> Self {
        Self {
            period,
            drawdown_pct,
        }
    }
}
