//! Downloadable artifacts: report file names and the strategy code template.

use chrono::{DateTime, Utc};
use tracing::debug;

const STRATEGY_TEMPLATE: &str = r#""""
Trading Strategy for {ticker}
Description: {description}

This is a simple buy-and-hold strategy.
"""

import pandas as pd
import numpy as np


def strategy(df: pd.DataFrame) -> pd.Series:
    """
    Simple buy-and-hold strategy

    Args:
        df: DataFrame with OHLCV data (columns: Open, High, Low, Close, Volume)

    Returns:
        Series of trading signals (1 = long, 0 = neutral, -1 = short)
    """
    signals = pd.Series(1, index=df.index)
    return signals


def calculate_returns(df: pd.DataFrame, signals: pd.Series) -> pd.Series:
    """Daily strategy returns, signals shifted by one bar."""
    returns = df['Close'].pct_change()
    return signals.shift(1) * returns


def backtest(df: pd.DataFrame, initial_capital: float = 10000) -> dict:
    """Run the strategy over `df` and report final value, return and Sharpe ratio."""
    signals = strategy(df)
    returns = calculate_returns(df, signals)

    cumulative_returns = (1 + returns).cumprod()
    final_value = initial_capital * cumulative_returns.iloc[-1]

    total_return = (final_value - initial_capital) / initial_capital * 100
    sharpe_ratio = returns.mean() / returns.std() * np.sqrt(252) if returns.std() > 0 else 0

    return {
        "final_value": final_value,
        "total_return": total_return,
        "sharpe_ratio": sharpe_ratio,
        "signals": signals,
    }
"#;

/// File name of an exported report: `<product>-report-<ticker>-<unix millis>.txt`.
#[must_use]
pub fn report_filename(product: &str, ticker: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "{}-report-{}-{}.txt",
        product.to_lowercase(),
        file_safe(ticker),
        generated_at.timestamp_millis()
    )
}

/// Replaces characters that are unsafe in file names.
fn file_safe(ticker: &str) -> String {
    ticker
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Source code offered alongside a simulation.
///
/// The code is opaque text to this system; it is never parsed or executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyCodeArtifact {
    pub ticker: String,
    pub description: String,
    pub file_name: String,
    pub code: String,
}

impl StrategyCodeArtifact {
    /// Renders the default buy-and-hold template for `ticker`.
    #[must_use]
    pub fn buy_and_hold(ticker: &str, description: &str, generated_at: DateTime<Utc>) -> Self {
        let code = STRATEGY_TEMPLATE
            .replace("{ticker}", ticker)
            .replace("{description}", description);
        let file_name = format!(
            "strategy_{}_{}.py",
            file_safe(ticker),
            generated_at.timestamp_millis()
        );
        debug!(ticker, file_name = %file_name, "Rendered strategy code");

        Self {
            ticker: ticker.to_string(),
            description: description.to_string(),
            file_name,
            code,
        }
    }
}
