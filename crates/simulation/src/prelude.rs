//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use quanta_simulation::prelude::*;
//! ```

// Engine
pub use crate::engine::{SimulationEngine, SimulationOutcome};

// Path generation
pub use crate::monte_carlo::{PathGenerator, VALUE_FLOOR};

// Growth models
pub use crate::growth_model::{
    DeterministicGrowth, GeometricBrownianMotion, GrowthModel, StepContext, TrendNoise,
};

// Market assumptions
pub use crate::market::{AssetClass, MarketProfile};

// Analytics
pub use crate::cone::{ConeMethod, ConeMultipliers, ProbabilityConeBuilder};
pub use crate::distribution::{DEFAULT_BUCKET_WIDTH_PCT, DistributionBinner};
pub use crate::drawdown::DrawdownTracker;
pub use crate::statistics::{DrawdownPolicy, StatisticsCalculator};
