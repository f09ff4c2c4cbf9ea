//! Probability cone: quantile bands of all paths over time.

use crate::quantile;
use quanta_domain::{PathSet, ProbabilityConePoint};
use rayon::prelude::*;

/// Percentiles bounding the 95% band.
pub const BAND_95: (f64, f64) = (2.5, 97.5);
/// Percentiles bounding the 75% band.
pub const BAND_75: (f64, f64) = (12.5, 87.5);

/// Fixed fractions of the mean used by the closed-form cone.
///
/// Only constructible through [`ConeMultipliers::new`] or `Default`, so the
/// fractions are always ordered around 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeMultipliers {
    lower95: f64,
    lower75: f64,
    upper75: f64,
    upper95: f64,
}

impl ConeMultipliers {
    /// Creates multipliers, requiring `0 <= lower95 <= lower75 <= 1 <= upper75 <= upper95`.
    #[must_use]
    pub fn new(lower95: f64, lower75: f64, upper75: f64, upper95: f64) -> Option<Self> {
        let ordered =
            0.0 <= lower95 && lower95 <= lower75 && lower75 <= 1.0 && 1.0 <= upper75 && upper75 <= upper95;
        ordered.then_some(Self {
            lower95,
            lower75,
            upper75,
            upper95,
        })
    }

    #[must_use]
    pub fn lower95(&self) -> f64 {
        self.lower95
    }

    #[must_use]
    pub fn lower75(&self) -> f64 {
        self.lower75
    }

    #[must_use]
    pub fn upper75(&self) -> f64 {
        self.upper75
    }

    #[must_use]
    pub fn upper95(&self) -> f64 {
        self.upper95
    }
}

impl Default for ConeMultipliers {
    fn default() -> Self {
        Self {
            lower95: 0.6,
            lower75: 0.8,
            upper75: 1.2,
            upper95: 1.4,
        }
    }
}

/// How the bands around the mean are derived.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ConeMethod {
    /// Cross-sectional 2.5 / 12.5 / 87.5 / 97.5 percentiles.
    ///
    /// On skewed ensembles the mean can sit outside the 75% band; the bands
    /// are then widened just enough to contain it.
    #[default]
    Empirical,
    /// Closed-form bands at fixed fractions of the cross-sectional mean.
    FixedMultiplier(ConeMultipliers),
}

/// Builds one cone point per period.
#[derive(Debug, Clone, Default)]
pub struct ProbabilityConeBuilder {
    method: ConeMethod,
}

impl ProbabilityConeBuilder {
    #[must_use]
    pub fn new(method: ConeMethod) -> Self {
        Self { method }
    }

    #[must_use]
    pub fn method(&self) -> ConeMethod {
        self.method
    }

    /// Computes the cone of `set`, ordered by period.
    #[must_use]
    pub fn build_cone(&self, set: &PathSet) -> Vec<ProbabilityConePoint> {
        (0..set.path_length())
            .into_par_iter()
            .map(|period| self.point(period, &set.cross_section(period)))
            .collect()
    }

    fn point(&self, period: usize, values: &[f64]) -> ProbabilityConePoint {
        let mean = quantile::mean(values);
        match self.method {
            ConeMethod::Empirical => {
                let sorted = quantile::sorted(values);
                let lower75 = quantile::percentile(&sorted, BAND_75.0).min(mean);
                let upper75 = quantile::percentile(&sorted, BAND_75.1).max(mean);
                ProbabilityConePoint {
                    period,
                    mean,
                    upper95: quantile::percentile(&sorted, BAND_95.1).max(upper75),
                    upper75,
                    lower75,
                    lower95: quantile::percentile(&sorted, BAND_95.0).min(lower75),
                }
            }
            ConeMethod::FixedMultiplier(m) => ProbabilityConePoint {
                period,
                mean,
                upper95: mean * m.upper95,
                upper75: mean * m.upper75,
                lower75: mean * m.lower75,
                lower95: mean * m.lower95,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quanta_domain::SimulationPath;

    fn set(paths: &[&[f64]]) -> PathSet {
        PathSet::new(
            100.0,
            12,
            paths
                .iter()
                .map(|p| SimulationPath::from_values(p.to_vec()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_one_point_per_period() {
        let data = set(&[&[100.0, 110.0, 120.0], &[100.0, 90.0, 80.0]]);
        let cone = ProbabilityConeBuilder::default().build_cone(&data);
        assert_eq!(cone.len(), 3);
        assert_eq!(cone.iter().map(|p| p.period).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(cone[0].mean, 100.0);
        assert_eq!(cone[0].lower95, 100.0);
        assert_eq!(cone[0].upper95, 100.0);
    }

    #[test]
    fn test_empirical_contains_mean_on_skewed_data() {
        // One extreme outlier drags the mean above the 87.5th percentile.
        let mut paths: Vec<Vec<f64>> = (0..9).map(|_| vec![100.0, 100.0]).collect();
        paths.push(vec![100.0, 10_000.0]);
        let refs: Vec<&[f64]> = paths.iter().map(Vec::as_slice).collect();
        let cone = ProbabilityConeBuilder::default().build_cone(&set(&refs));

        for point in &cone {
            assert!(point.is_ordered(), "unordered point {point:?}");
        }
        assert!((cone[1].mean - 1_090.0).abs() < 1e-9);
        assert_eq!(cone[1].upper75, cone[1].mean);
    }

    #[test]
    fn test_fixed_multiplier() {
        let data = set(&[&[100.0, 200.0]]);
        let cone = ProbabilityConeBuilder::new(ConeMethod::FixedMultiplier(ConeMultipliers::default()))
            .build_cone(&data);
        let p = cone[1];
        assert_eq!(p.mean, 200.0);
        assert!((p.upper95 - 280.0).abs() < 1e-9);
        assert!((p.upper75 - 240.0).abs() < 1e-9);
        assert!((p.lower75 - 160.0).abs() < 1e-9);
        assert!((p.lower95 - 120.0).abs() < 1e-9);
        assert!(p.is_ordered());
    }

    #[test]
    fn test_multipliers_must_be_ordered() {
        assert!(ConeMultipliers::new(0.6, 0.8, 1.2, 1.4).is_some());
        assert!(ConeMultipliers::new(0.9, 0.8, 1.2, 1.4).is_none());
        assert!(ConeMultipliers::new(0.6, 0.8, 0.9, 1.4).is_none());
        assert!(ConeMultipliers::new(f64::NAN, 0.8, 1.2, 1.4).is_none());
    }

    #[test]
    fn test_custom_multipliers_keep_cone_ordered() {
        let m = ConeMultipliers::new(0.5, 0.75, 1.1, 1.9).unwrap();
        assert_eq!((m.lower95(), m.lower75(), m.upper75(), m.upper95()), (0.5, 0.75, 1.1, 1.9));

        let data = set(&[&[100.0, 130.0, 70.0], &[100.0, 90.0, 160.0]]);
        let cone = ProbabilityConeBuilder::new(ConeMethod::FixedMultiplier(m)).build_cone(&data);
        assert!(cone.iter().all(ProbabilityConePoint::is_ordered));
        assert!((cone[2].upper95 - 115.0 * 1.9).abs() < 1e-9);
    }
}
