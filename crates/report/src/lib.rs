//! Human-readable rendering of simulation results.
//!
//! This crate provides:
//! - Interpretation thresholds for the Sharpe ratio and win rate
//! - The plain-text simulation report
//! - Export artifacts (report file names, strategy code template)

/// Export artifacts.
pub mod export;
/// Report rendering.
pub mod formatter;
/// Interpretation thresholds.
pub mod policy;

pub use export::{StrategyCodeArtifact, report_filename};
pub use formatter::{PRODUCT_NAME, ReportFormatter, format_money};
pub use policy::{InterpretationRules, RoiFraming, SharpeRating, WinRateFraming};
