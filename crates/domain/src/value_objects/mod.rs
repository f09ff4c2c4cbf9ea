pub mod cone_point;
pub mod distribution_bin;
pub mod drawdown_point;
pub mod market_assumptions;
pub mod statistics_summary;

pub use cone_point::ProbabilityConePoint;
pub use distribution_bin::DistributionBin;
pub use drawdown_point::DrawdownPoint;
pub use market_assumptions::MarketAssumptions;
pub use statistics_summary::{StatisticsSummary, TerminalPercentiles};
