//! Baseline market assumptions by asset class.
//!
//! When a request does not override them, path generation derives drift and
//! volatility from the ticker's asset class. Figures are daily return
//! statistics annualized over 252 trading days.

use quanta_domain::MarketAssumptions;

/// Trading days used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Coarse asset classes with distinct growth and risk profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    /// Crypto assets.
    Crypto,
    /// Large-cap technology stocks.
    LargeCapTech,
    /// Broad index ETFs.
    BroadEtf,
    /// Anything else.
    Other,
}

impl AssetClass {
    /// Classifies a ticker symbol (case-insensitive).
    #[must_use]
    pub fn classify(ticker: &str) -> Self {
        match ticker.trim().to_uppercase().as_str() {
            "BTC-USD" | "BTCUSD" | "BTC" | "ETH-USD" | "ETHUSD" | "ETH" => Self::Crypto,
            "AAPL" | "MSFT" | "GOOGL" | "TSLA" | "AMZN" | "NVDA" | "META" => Self::LargeCapTech,
            "SPY" | "QQQ" | "VOO" | "VTI" => Self::BroadEtf,
            _ => Self::Other,
        }
    }

    /// Daily mean return and daily standard deviation.
    #[must_use]
    pub fn daily_stats(self) -> (f64, f64) {
        match self {
            Self::Crypto => (0.0005, 0.03),
            Self::LargeCapTech => (0.0004, 0.02),
            Self::BroadEtf => (0.0003, 0.015),
            Self::Other => (0.0003, 0.018),
        }
    }
}

/// Market assumptions resolved for one ticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketProfile {
    pub asset_class: AssetClass,
    pub assumptions: MarketAssumptions,
}

impl MarketProfile {
    /// Resolves the profile for `ticker`.
    #[must_use]
    pub fn for_ticker(ticker: &str) -> Self {
        let asset_class = AssetClass::classify(ticker);
        let (daily_mean, daily_std) = asset_class.daily_stats();
        Self {
            asset_class,
            assumptions: MarketAssumptions::from_daily(daily_mean, daily_std, TRADING_DAYS_PER_YEAR),
        }
    }
}
