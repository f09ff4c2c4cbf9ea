//! Core domain types for the Quanta simulation engine.
//!
//! This crate contains the value objects shared by the simulation, report and
//! API layers:
//! - Simulation requests and their validation limits
//! - Simulated paths and path sets
//! - Derived analytics (statistics, distribution, drawdown, probability cone)
//! - The error taxonomy used across the workspace

/// Error types.
pub mod error;
/// Simulated paths and path sets.
pub mod path;
/// Simulation requests.
pub mod request;
/// Derived analytics value objects.
pub mod value_objects;

pub use error::{ComputationError, SimulationError, ValidationError};
pub use path::{PathSet, SimulationPath};
pub use request::{DEFAULT_MAX_TOTAL_STEPS, GrowthModelKind, SimulationLimits, SimulationRequest};
pub use value_objects::{
    DistributionBin, DrawdownPoint, MarketAssumptions, ProbabilityConePoint, StatisticsSummary,
    TerminalPercentiles,
};
