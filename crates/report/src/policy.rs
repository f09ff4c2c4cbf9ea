//! Interpretation thresholds applied when describing results to users.

use std::fmt;

/// Sharpe ratio from which returns are described as good.
pub const SHARPE_GOOD_THRESHOLD: f64 = 1.0;
/// Sharpe ratio from which returns are described as very good.
pub const SHARPE_VERY_GOOD_THRESHOLD: f64 = 2.0;
/// Sharpe ratio from which returns are described as excellent.
pub const SHARPE_EXCELLENT_THRESHOLD: f64 = 3.0;
/// Win rate (percent) above which a strategy is framed as favoring profit.
pub const WIN_RATE_THRESHOLD_PCT: f64 = 50.0;

/// Qualitative bucket of a Sharpe ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharpeRating {
    SubPar,
    Good,
    VeryGood,
    Excellent,
    /// No ratio could be computed (zero volatility).
    Undefined,
}

impl SharpeRating {
    /// Short label, e.g. "Very Good".
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SubPar => "Sub-par",
            Self::Good => "Good",
            Self::VeryGood => "Very Good",
            Self::Excellent => "Excellent",
            Self::Undefined => "Undefined",
        }
    }

    /// Sentence used in the report's interpretation block.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::SubPar => "Sub-par risk-adjusted returns",
            Self::Good => "Good risk-adjusted returns",
            Self::VeryGood => "Very good risk-adjusted returns",
            Self::Excellent => "Excellent risk-adjusted returns",
            Self::Undefined => "Undefined (returns show no volatility)",
        }
    }
}

impl fmt::Display for SharpeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the share of profitable paths favors profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinRateFraming {
    FavorsProfit,
    FavorsLoss,
}

impl WinRateFraming {
    #[must_use]
    pub fn is_favorable(self) -> bool {
        self == Self::FavorsProfit
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::FavorsProfit => "More likely to profit than lose",
            Self::FavorsLoss => "More likely to lose than profit",
        }
    }
}

/// Sign of the median return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoiFraming {
    Positive,
    Negative,
}

impl RoiFraming {
    #[must_use]
    pub fn is_favorable(self) -> bool {
        self == Self::Positive
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Positive => "Strategy showed positive returns",
            Self::Negative => "Strategy showed negative returns",
        }
    }
}

/// Thresholds used to classify results.
///
/// Defaults to the module constants; each threshold can be overridden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpretationRules {
    pub sharpe_good: f64,
    pub sharpe_very_good: f64,
    pub sharpe_excellent: f64,
    pub win_rate_threshold_pct: f64,
}

impl Default for InterpretationRules {
    fn default() -> Self {
        Self {
            sharpe_good: SHARPE_GOOD_THRESHOLD,
            sharpe_very_good: SHARPE_VERY_GOOD_THRESHOLD,
            sharpe_excellent: SHARPE_EXCELLENT_THRESHOLD,
            win_rate_threshold_pct: WIN_RATE_THRESHOLD_PCT,
        }
    }
}

impl InterpretationRules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the three Sharpe bucket boundaries.
    #[must_use]
    pub fn with_sharpe_thresholds(mut self, good: f64, very_good: f64, excellent: f64) -> Self {
        self.sharpe_good = good;
        self.sharpe_very_good = very_good;
        self.sharpe_excellent = excellent;
        self
    }

    #[must_use]
    pub fn with_win_rate_threshold(mut self, pct: f64) -> Self {
        self.win_rate_threshold_pct = pct;
        self
    }

    /// Buckets a Sharpe ratio; lower bounds are inclusive.
    #[must_use]
    pub fn rate_sharpe(&self, sharpe: Option<f64>) -> SharpeRating {
        match sharpe {
            None => SharpeRating::Undefined,
            Some(s) if s < self.sharpe_good => SharpeRating::SubPar,
            Some(s) if s < self.sharpe_very_good => SharpeRating::Good,
            Some(s) if s < self.sharpe_excellent => SharpeRating::VeryGood,
            Some(_) => SharpeRating::Excellent,
        }
    }

    /// Frames a win rate; exactly the threshold does not favor profit.
    #[must_use]
    pub fn frame_win_rate(&self, probability_of_profit: f64) -> WinRateFraming {
        if probability_of_profit > self.win_rate_threshold_pct {
            WinRateFraming::FavorsProfit
        } else {
            WinRateFraming::FavorsLoss
        }
    }

    #[must_use]
    pub fn frame_roi(&self, roi_pct: f64) -> RoiFraming {
        if roi_pct > 0.0 {
            RoiFraming::Positive
        } else {
            RoiFraming::Negative
        }
    }
}
