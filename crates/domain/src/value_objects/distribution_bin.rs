use serde::{Deserialize, Serialize};

/// One fixed-width bucket of terminal ROI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionBin {
    /// Bucket center in ROI percent.
    pub return_pct: f64,
    /// Number of paths whose terminal ROI falls in the bucket.
    pub frequency: u32,
}

impl DistributionBin {
    pub fn new(return_pct: f64, frequency: u32) -> Self {
        Self {
            return_pct,
            frequency,
        }
    }
}
