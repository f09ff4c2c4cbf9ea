//! Histogram of terminal returns.

use quanta_domain::{DistributionBin, PathSet, ValidationError};
use tracing::debug;

/// Default bucket width in ROI percentage points.
pub const DEFAULT_BUCKET_WIDTH_PCT: f64 = 5.0;

/// Upper bound on the number of buckets a single histogram may hold.
///
/// Ranges that would need more are binned with a wider bucket, a whole
/// multiple of the requested width.
pub const MAX_BUCKETS: usize = 1_000;

/// Buckets terminal ROI into contiguous fixed-width intervals.
pub struct DistributionBinner;

impl DistributionBinner {
    /// Bins the terminal ROI (in percent) of every path of `set`.
    ///
    /// Buckets span `floor(min)` to `ceil(max)` in steps of `bucket_width`;
    /// empty buckets are emitted so the centers form a gap-free sequence, and
    /// the frequencies sum to the number of paths.
    ///
    /// When the range would need more than [`MAX_BUCKETS`] buckets the width
    /// is scaled up by the smallest whole factor that fits.
    ///
    /// # Errors
    /// Fails for a non-positive or non-finite width.
    pub fn bin(set: &PathSet, bucket_width: f64) -> Result<Vec<DistributionBin>, ValidationError> {
        if !bucket_width.is_finite() || bucket_width <= 0.0 {
            return Err(ValidationError::NotPositive {
                field: "bucket_width",
                value: bucket_width,
            });
        }

        let rois = set.terminal_roi_pct();
        let Some(lowest) = rois.iter().copied().reduce(f64::min) else {
            return Ok(Vec::new());
        };
        let highest = rois.iter().copied().fold(lowest, f64::max);

        let start = lowest.floor();
        let end = highest.ceil();
        let width = effective_width(end - start, bucket_width);
        if width > bucket_width {
            debug!(requested = bucket_width, width, "Widened histogram buckets");
        }
        let count = ((((end - start) / width).ceil() as usize).max(1)).min(MAX_BUCKETS);

        let mut frequencies = vec![0u32; count];
        for roi in rois {
            let index = (((roi - start) / width).floor() as usize).min(count - 1);
            frequencies[index] += 1;
        }

        Ok(frequencies
            .into_iter()
            .enumerate()
            .map(|(i, frequency)| {
                DistributionBin::new(start + width * (i as f64 + 0.5), frequency)
            })
            .collect())
    }
}

/// Smallest whole multiple of `requested` that covers `range` in at most
/// [`MAX_BUCKETS`] buckets.
fn effective_width(range: f64, requested: f64) -> f64 {
    let needed = range / requested;
    if needed <= MAX_BUCKETS as f64 {
        return requested;
    }
    requested * (needed / MAX_BUCKETS as f64).ceil()
}
