//! Plain-text simulation report.

use crate::policy::InterpretationRules;
use chrono::{DateTime, Utc};
use quanta_domain::{SimulationRequest, StatisticsSummary};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::fmt::Write;
use tracing::debug;

/// Product name printed in report headers and export file names.
pub const PRODUCT_NAME: &str = "Quanta";

const DISCLAIMER: &str = "Note: This is a Monte Carlo simulation based on historical volatility.\n\
                          Past performance does not guarantee future results.";

/// Renders statistics as the plain-text report users download.
pub struct ReportFormatter;

impl ReportFormatter {
    /// Formats the results and interpretation blocks for `summary`.
    ///
    /// Pure function of its inputs: the same summary, request and rules always
    /// yield the same text.
    #[must_use]
    pub fn format(
        summary: &StatisticsSummary,
        request: &SimulationRequest,
        rules: &InterpretationRules,
    ) -> String {
        render(|out| write_body(out, summary, request, rules))
    }

    /// Full report: header, results, interpretation and disclaimer.
    #[must_use]
    pub fn render_report(
        summary: &StatisticsSummary,
        request: &SimulationRequest,
        rules: &InterpretationRules,
        generated_at: DateTime<Utc>,
    ) -> String {
        let out = render(|out| write_report(out, summary, request, rules, generated_at));
        debug!(ticker = %request.ticker, bytes = out.len(), "Rendered report");
        out
    }
}

fn render(write: impl FnOnce(&mut String) -> std::fmt::Result) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write(&mut out);
    out
}

fn write_report(
    out: &mut String,
    summary: &StatisticsSummary,
    request: &SimulationRequest,
    rules: &InterpretationRules,
    generated_at: DateTime<Utc>,
) -> std::fmt::Result {
    write_header(out, request, generated_at)?;
    writeln!(out)?;
    write_body(out, summary, request, rules)?;
    writeln!(out)?;
    writeln!(out, "{DISCLAIMER}")?;
    writeln!(out)?;
    writeln!(out, "Generated by {PRODUCT_NAME}")
}

fn write_header(
    out: &mut String,
    request: &SimulationRequest,
    generated_at: DateTime<Utc>,
) -> std::fmt::Result {
    let title = format!("{} SIMULATION REPORT", PRODUCT_NAME.to_uppercase());
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(title.len()))?;
    writeln!(out)?;
    writeln!(out, "Strategy: {}", request.strategy_description)?;
    writeln!(out, "Ticker: {}", request.ticker)?;
    writeln!(out, "Period: {} years", request.years)?;
    writeln!(out, "Simulations: {}", request.num_simulations)?;
    writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC"))
}

fn write_body(
    out: &mut String,
    summary: &StatisticsSummary,
    request: &SimulationRequest,
    rules: &InterpretationRules,
) -> std::fmt::Result {
    write_results(out, summary, request)?;
    writeln!(out)?;
    write_interpretation(out, summary, rules)
}

fn write_results(
    out: &mut String,
    s: &StatisticsSummary,
    request: &SimulationRequest,
) -> std::fmt::Result {
    writeln!(out, "RESULTS:")?;
    writeln!(out, "--------")?;
    writeln!(out, "Initial Investment: {}", format_money(request.initial_investment))?;
    writeln!(
        out,
        "Median Return: {} ({:.2}% ROI)",
        format_money(s.median),
        s.median_roi
    )?;
    writeln!(
        out,
        "Mean Return: {} ({:.2}% ROI)",
        format_money(s.mean),
        s.mean_roi
    )?;
    writeln!(out, "Win Rate: {:.1}%", s.probability_of_profit)?;
    writeln!(out, "Sharpe Ratio: {}", format_ratio(s.sharpe_ratio))?;
    writeln!(
        out,
        "Return Range: {} - {}",
        format_money(s.min),
        format_money(s.max)
    )?;
    writeln!(
        out,
        "5th-95th Percentile: {} - {}",
        format_money(s.percentiles.p5),
        format_money(s.percentiles.p95)
    )?;
    writeln!(out, "Annualized Return: {:.2}%", s.annualized_return * 100.0)?;
    writeln!(out, "Volatility: {:.2}%", s.volatility * 100.0)?;
    writeln!(out, "Max Drawdown: {:.2}%", s.max_drawdown)
}

fn write_interpretation(
    out: &mut String,
    s: &StatisticsSummary,
    rules: &InterpretationRules,
) -> std::fmt::Result {
    let roi = rules.frame_roi(s.median_roi);
    let win_rate = rules.frame_win_rate(s.probability_of_profit);

    writeln!(out, "INTERPRETATION:")?;
    writeln!(out, "--------------")?;
    writeln!(out, "{} {}", mark(roi.is_favorable()), roi.description())?;
    writeln!(out, "{} {}", mark(win_rate.is_favorable()), win_rate.description())?;
    writeln!(
        out,
        "Sharpe Ratio indicates: {}",
        rules.rate_sharpe(s.sharpe_ratio).description()
    )
}

fn mark(favorable: bool) -> char {
    if favorable { '✓' } else { '✗' }
}

fn format_ratio(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "n/a".to_string(), |r| format!("{r:.2}"))
}

/// Formats a currency amount with two decimals and thousands separators,
/// e.g. `$12,345.68`. Non-finite values render as `n/a`.
#[must_use]
pub fn format_money(value: f64) -> String {
    Decimal::from_f64(value).map_or_else(|| "n/a".to_string(), format_decimal_money)
}

/// [`format_money`] for an exact decimal amount.
#[must_use]
pub fn format_decimal_money(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    let text = rounded.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use quanta_domain::TerminalPercentiles;
    use rust_decimal_macros::dec;

    fn summary() -> StatisticsSummary {
        StatisticsSummary {
            initial_investment: 10_000.0,
            num_simulations: 1_000,
            median: 13_456.789,
            median_roi: 34.56789,
            min: 4_200.0,
            max: 58_000.5,
            mean: 14_000.0,
            std_dev: 3_000.0,
            mean_roi: 40.0,
            probability_of_profit: 71.3,
            annualized_return: 0.0812,
            volatility: 0.21,
            sharpe_ratio: Some(2.4),
            max_drawdown: -18.25,
            percentiles: TerminalPercentiles {
                p5: 7_000.0,
                p25: 10_500.0,
                p50: 13_456.789,
                p75: 16_000.0,
                p95: 25_000.0,
            },
        }
    }

    fn request() -> SimulationRequest {
        SimulationRequest::new("AAPL", "Buy on 50-week MA retracement", 5, 10_000.0, 1_000)
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(format_decimal_money(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_decimal_money(dec!(999.5)), "$999.50");
        assert_eq!(format_decimal_money(dec!(100)), "$100.00");
        assert_eq!(format_decimal_money(dec!(-12345.6)), "-$12,345.60");
        assert_eq!(format_decimal_money(dec!(-0.001)), "$0.00");
        assert_eq!(format_money(f64::NAN), "n/a");
    }

    #[test]
    fn test_format_contains_results_and_interpretation() {
        let text = ReportFormatter::format(&summary(), &request(), &InterpretationRules::default());

        assert!(text.contains("Median Return: $13,456.79 (34.57% ROI)"));
        assert!(text.contains("Win Rate: 71.3%"));
        assert!(text.contains("Sharpe Ratio: 2.40"));
        assert!(text.contains("Return Range: $4,200.00 - $58,000.50"));
        assert!(text.contains("Max Drawdown: -18.25%"));
        assert!(text.contains("✓ Strategy showed positive returns"));
        assert!(text.contains("✓ More likely to profit than lose"));
        assert!(text.contains("Sharpe Ratio indicates: Very good risk-adjusted returns"));
    }

    #[test]
    fn test_format_negative_outcome() {
        let mut s = summary();
        s.median_roi = -3.0;
        s.probability_of_profit = 50.0;
        s.sharpe_ratio = None;
        let text = ReportFormatter::format(&s, &request(), &InterpretationRules::default());

        assert!(text.contains("✗ Strategy showed negative returns"));
        assert!(text.contains("✗ More likely to lose than profit"));
        assert!(text.contains("Sharpe Ratio: n/a"));
        assert!(text.contains("Undefined"));
    }

    #[test]
    fn test_render_report_layout() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let text = ReportFormatter::render_report(
            &summary(),
            &request(),
            &InterpretationRules::default(),
            at,
        );

        assert!(text.starts_with("QUANTA SIMULATION REPORT\n========================\n"));
        assert!(text.contains("Strategy: Buy on 50-week MA retracement"));
        assert!(text.contains("Period: 5 years"));
        assert!(text.contains("Simulations: 1000"));
        assert!(text.contains("Generated: 2026-03-14 09:26:53 UTC"));
        assert!(text.contains("Past performance does not guarantee future results."));
        assert!(text.trim_end().ends_with("Generated by Quanta"));
    }

    #[test]
    fn test_render_report_wraps_formatted_body() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let rules = InterpretationRules::default();
        let text = ReportFormatter::render_report(&summary(), &request(), &rules, at);
        let body = ReportFormatter::format(&summary(), &request(), &rules);

        let header_end = text.find("UTC\n\n").unwrap() + "UTC\n\n".len();
        assert!(text[header_end..].starts_with(&body));
        assert!(text.ends_with(&format!("\n\n{DISCLAIMER}\n\nGenerated by Quanta\n")));
        assert_eq!(text.matches("RESULTS:").count(), 1);
    }

    #[test]
    fn test_format_is_deterministic() {
        let rules = InterpretationRules::default();
        assert_eq!(
            ReportFormatter::format(&summary(), &request(), &rules),
            ReportFormatter::format(&summary(), &request(), &rules)
        );
    }
}
