//! Wire models for requests and responses.

use quanta_domain::{
    DistributionBin, DrawdownPoint, GrowthModelKind, ProbabilityConePoint, SimulationRequest,
    StatisticsSummary,
};
use quanta_simulation::engine::SimulationOutcome;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// Body of `POST /api/simulate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SimulateRequest {
    /// Free-text strategy description.
    #[serde(default)]
    pub description: String,
    /// Ticker symbol.
    pub ticker: String,
    /// Horizon in years.
    pub years: i64,
    /// Starting capital.
    pub initial_investment: f64,
    /// Number of paths to generate.
    pub num_simulations: i64,
    /// Periods per year (default 12).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods_per_year: Option<i64>,
    /// Seed for reproducible results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Growth model: `geometric_brownian`, `trend_noise` or `deterministic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub model: Option<GrowthModelKind>,
    /// Include distribution, drawdown and cone in the response.
    #[serde(default)]
    pub include_analytics: bool,
}

impl SimulateRequest {
    /// Converts to the domain request.
    ///
    /// Negative counts become zero so they fail validation with the right
    /// field name instead of being rejected by the JSON parser.
    #[must_use]
    pub fn to_domain(&self) -> SimulationRequest {
        let mut request = SimulationRequest::new(
            self.ticker.trim(),
            self.description.clone(),
            to_count(self.years),
            self.initial_investment,
            to_count(self.num_simulations),
        );
        if let Some(ppy) = self.periods_per_year {
            request = request.with_periods_per_year(to_count(ppy));
        }
        if let Some(seed) = self.seed {
            request = request.with_seed(seed);
        }
        if let Some(model) = self.model {
            request = request.with_model(model);
        }
        request
    }

    #[must_use]
    pub fn with_analytics(mut self) -> Self {
        self.include_analytics = true;
        self
    }
}

impl From<&SimulationRequest> for SimulateRequest {
    fn from(request: &SimulationRequest) -> Self {
        Self {
            description: request.strategy_description.clone(),
            ticker: request.ticker.clone(),
            years: i64::from(request.years),
            initial_investment: request.initial_investment,
            num_simulations: i64::from(request.num_simulations),
            periods_per_year: Some(i64::from(request.periods_per_year)),
            seed: request.seed,
            model: Some(request.model),
            include_analytics: false,
        }
    }
}

fn to_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// One period of the sampled paths: `{ "month": i, "path_1": v, ... }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct PathRow {
    /// Period index (0 is the initial value).
    pub month: usize,
    /// Value of each sampled path at this period.
    pub values: Vec<f64>,
}

impl Serialize for PathRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("month", &self.month)?;
        for (i, value) in self.values.iter().enumerate() {
            map.serialize_entry(&format!("path_{}", i + 1), value)?;
        }
        map.end()
    }
}

impl TryFrom<Map<String, Value>> for PathRow {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let month = map
            .get("month")
            .and_then(Value::as_u64)
            .ok_or("missing integer field `month`")? as usize;

        let mut indexed = Vec::new();
        for (key, value) in &map {
            let Some(index) = key.strip_prefix("path_") else {
                continue;
            };
            let index: usize = index
                .parse()
                .map_err(|_| format!("invalid path column `{key}`"))?;
            let value = value
                .as_f64()
                .ok_or_else(|| format!("non-numeric value in `{key}`"))?;
            indexed.push((index, value));
        }
        indexed.sort_by_key(|(index, _)| *index);

        Ok(Self {
            month,
            values: indexed.into_iter().map(|(_, v)| v).collect(),
        })
    }
}

/// Summary statistics on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatisticsResponse {
    pub median: f64,
    pub median_roi: f64,
    pub probability_of_profit: f64,
    /// `null` when volatility is zero.
    pub sharpe_ratio: Option<f64>,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub mean: f64,
    #[serde(default)]
    pub mean_roi: f64,
    #[serde(default)]
    pub std_dev: f64,
    #[serde(default)]
    pub annualized_return: f64,
    #[serde(default)]
    pub volatility: f64,
    #[serde(default)]
    pub max_drawdown: f64,
}

impl From<&StatisticsSummary> for StatisticsResponse {
    fn from(s: &StatisticsSummary) -> Self {
        Self {
            median: s.median,
            median_roi: s.median_roi,
            probability_of_profit: s.probability_of_profit,
            sharpe_ratio: s.sharpe_ratio,
            min: s.min,
            max: s.max,
            mean: s.mean,
            mean_roi: s.mean_roi,
            std_dev: s.std_dev,
            annualized_return: s.annualized_return,
            volatility: s.volatility,
            max_drawdown: s.max_drawdown,
        }
    }
}

/// Derived chart data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsResponse {
    #[schema(value_type = Vec<Object>)]
    pub distribution: Vec<DistributionBin>,
    #[schema(value_type = Vec<Object>)]
    pub drawdown: Vec<DrawdownPoint>,
    #[schema(value_type = Vec<Object>)]
    pub cone: Vec<ProbabilityConePoint>,
}

/// Response of `POST /api/simulate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SimulateResponse {
    /// Identifier of this response.
    #[serde(default)]
    pub simulation_id: Uuid,
    /// Seed the paths were generated from.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Sampled paths, one row per period.
    #[schema(value_type = Vec<Object>)]
    pub paths: Vec<PathRow>,
    pub statistics: StatisticsResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsResponse>,
}

impl SimulateResponse {
    /// Builds the response from an outcome, sampling the first `path_limit` paths.
    #[must_use]
    pub fn from_outcome(outcome: &SimulationOutcome, path_limit: usize, analytics: bool) -> Self {
        let sampled = &outcome.path_set.paths()[..path_limit.min(outcome.path_set.len())];
        let paths = (0..outcome.path_set.path_length())
            .map(|month| PathRow {
                month,
                values: sampled.iter().map(|p| p.values()[month]).collect(),
            })
            .collect();

        Self {
            simulation_id: Uuid::new_v4(),
            seed: outcome.seed(),
            paths,
            statistics: StatisticsResponse::from(&outcome.summary),
            analytics: analytics.then(|| AnalyticsResponse {
                distribution: outcome.distribution.clone(),
                drawdown: outcome.drawdown.clone(),
                cone: outcome.cone.clone(),
            }),
        }
    }
}

/// Body of `POST /api/report`: the simulation to run and report on.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportRequest {
    #[serde(flatten)]
    pub simulation: SimulateRequest,
}

/// Plain-text report ready for download.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    pub file_name: String,
    pub content: String,
}

/// Body of `POST /api/strategy/code`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StrategyCodeRequest {
    #[serde(default)]
    pub description: String,
    pub ticker: String,
}

/// Strategy source ready for download.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StrategyCodeResponse {
    pub file_name: String,
    pub code: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    #[must_use]
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}
