//! Monte Carlo engine for strategy outcome simulation.
//!
//! This crate turns a validated request into a set of simulated value paths and
//! derives the analytics shown to users:
//! - Pluggable growth models and per-ticker market assumptions
//! - Parallel, seed-reproducible path generation
//! - Summary statistics, return distribution, drawdown and probability cone

/// Prelude module for convenient imports.
pub mod prelude;

/// Probability cone construction.
pub mod cone;
/// Terminal return histogram.
pub mod distribution;
/// Peak-to-trough drawdown tracking.
pub mod drawdown;
/// End-to-end simulation runs.
pub mod engine;
/// Growth models.
pub mod growth_model;
/// Baseline market assumptions by asset class.
pub mod market;
/// Path generation.
pub mod monte_carlo;
/// Order statistics helpers.
pub mod quantile;
/// Summary statistics.
pub mod statistics;
