//! Running peak-to-trough drawdown.
//!
//! The tracker is a strictly sequential scan with no look-ahead, so the same
//! type serves both a finished path and a live, growing one.

use quanta_domain::{DrawdownPoint, SimulationPath};

/// Tracks drawdown against the running maximum of a value series.
#[derive(Debug, Clone)]
pub struct DrawdownTracker {
    peak: f64,
    period: usize,
    max_drawdown_pct: f64,
}

impl DrawdownTracker {
    /// Starts tracking at period 0 with `initial` as the first peak.
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self {
            peak: initial,
            period: 0,
            max_drawdown_pct: 0.0,
        }
    }

    /// Feeds the value of the next period.
    pub fn push(&mut self, value: f64) -> DrawdownPoint {
        self.period += 1;
        let drawdown_pct = self.observe(value);
        DrawdownPoint::new(self.period, drawdown_pct)
    }

    fn observe(&mut self, value: f64) -> f64 {
        if value >= self.peak {
            self.peak = value;
            return 0.0;
        }
        if self.peak <= 0.0 {
            return 0.0;
        }
        let drawdown_pct = (value - self.peak) / self.peak * 100.0;
        self.max_drawdown_pct = self.max_drawdown_pct.min(drawdown_pct);
        drawdown_pct
    }

    /// Highest value seen so far.
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.peak
    }

    /// Most negative drawdown seen so far, in percent.
    #[must_use]
    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown_pct
    }

    /// Full drawdown history of a path, one point per period including period 0.
    #[must_use]
    pub fn track(path: &SimulationPath) -> Vec<DrawdownPoint> {
        let Some(initial) = path.initial_value() else {
            return Vec::new();
        };
        let mut tracker = Self::new(initial);
        let mut points = Vec::with_capacity(path.len());
        points.push(DrawdownPoint::new(0, 0.0));
        points.extend(path.values()[1..].iter().map(|v| tracker.push(*v)));
        points
    }

    /// Most negative drawdown of a path, in percent (0 for a path that never falls).
    #[must_use]
    pub fn max_drawdown_of(path: &SimulationPath) -> f64 {
        let Some(initial) = path.initial_value() else {
            return 0.0;
        };
        let mut tracker = Self::new(initial);
        for v in &path.values()[1..] {
            tracker.observe(*v);
        }
        tracker.max_drawdown()
    }
}
