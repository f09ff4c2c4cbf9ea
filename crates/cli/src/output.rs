//! Terminal tables.

use prettytable::{Table, row};
use quanta_api::models::StatisticsResponse;
use quanta_domain::{DistributionBin, ProbabilityConePoint, StatisticsSummary};
use quanta_report::{InterpretationRules, format_money};

fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

pub fn print_summary(s: &StatisticsSummary) {
    let rules = InterpretationRules::default();
    let mut table = Table::new();
    table.add_row(row![b->"Metric", b->"Value"]);
    table.add_row(row!["Initial investment", format_money(s.initial_investment)]);
    table.add_row(row!["Simulations", s.num_simulations]);
    table.add_row(row![
        "Median",
        format!("{} ({:.2}% ROI)", format_money(s.median), s.median_roi)
    ]);
    table.add_row(row![
        "Mean",
        format!("{} ({:.2}% ROI)", format_money(s.mean), s.mean_roi)
    ]);
    table.add_row(row!["Std dev", format_money(s.std_dev)]);
    table.add_row(row![
        "Range",
        format!("{} - {}", format_money(s.min), format_money(s.max))
    ]);
    table.add_row(row!["Win rate", format!("{:.1}%", s.probability_of_profit)]);
    table.add_row(row![
        "Sharpe ratio",
        format!("{} ({})", ratio(s.sharpe_ratio), rules.rate_sharpe(s.sharpe_ratio))
    ]);
    table.add_row(row!["Annualized return", format!("{:.2}%", s.annualized_return * 100.0)]);
    table.add_row(row!["Volatility", format!("{:.2}%", s.volatility * 100.0)]);
    table.add_row(row!["Max drawdown", format!("{:.2}%", s.max_drawdown)]);
    println!("\n📊 Simulation Results");
    table.printstd();

    let p = &s.percentiles;
    let mut percentiles = Table::new();
    percentiles.add_row(row![b->"P5", b->"P25", b->"P50", b->"P75", b->"P95"]);
    percentiles.add_row(row![
        format_money(p.p5),
        format_money(p.p25),
        format_money(p.p50),
        format_money(p.p75),
        format_money(p.p95)
    ]);
    println!("\nTerminal value percentiles");
    percentiles.printstd();
}

/// Prints the cone at each year boundary.
pub fn print_cone(cone: &[ProbabilityConePoint], periods_per_year: u32) {
    let step = periods_per_year.max(1) as usize;
    let mut table = Table::new();
    table.add_row(row![b->"Year", b->"Lower 95", b->"Lower 75", b->"Mean", b->"Upper 75", b->"Upper 95"]);
    for point in cone.iter().filter(|p| p.period % step == 0) {
        table.add_row(row![
            point.period / step,
            format_money(point.lower95),
            format_money(point.lower75),
            format_money(point.mean),
            format_money(point.upper75),
            format_money(point.upper95)
        ]);
    }
    println!("\nProbability cone");
    table.printstd();
}

/// Prints the non-empty histogram buckets.
pub fn print_distribution(bins: &[DistributionBin]) {
    let total: u32 = bins.iter().map(|b| b.frequency).sum();
    let mut table = Table::new();
    table.add_row(row![b->"ROI bucket", b->"Paths", b->"Share"]);
    for bin in bins.iter().filter(|b| b.frequency > 0) {
        table.add_row(row![
            format!("{:.1}%", bin.return_pct),
            bin.frequency,
            format!("{:.1}%", f64::from(bin.frequency) / f64::from(total.max(1)) * 100.0)
        ]);
    }
    println!("\nReturn distribution");
    table.printstd();
}

pub fn print_statistics(s: &StatisticsResponse) {
    let mut table = Table::new();
    table.add_row(row![b->"Metric", b->"Value"]);
    table.add_row(row![
        "Median",
        format!("{} ({:.2}% ROI)", format_money(s.median), s.median_roi)
    ]);
    table.add_row(row!["Win rate", format!("{:.1}%", s.probability_of_profit)]);
    table.add_row(row!["Sharpe ratio", ratio(s.sharpe_ratio)]);
    table.add_row(row![
        "Range",
        format!("{} - {}", format_money(s.min), format_money(s.max))
    ]);
    table.add_row(row!["Volatility", format!("{:.2}%", s.volatility * 100.0)]);
    table.add_row(row!["Max drawdown", format!("{:.2}%", s.max_drawdown)]);
    println!("\n📊 Remote Simulation Results");
    table.printstd();
}
