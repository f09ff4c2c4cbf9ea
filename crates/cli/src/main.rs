//! Command Line Interface for the Quanta simulation engine.
use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use quanta_api::models::SimulateRequest;
use quanta_api::{ApiServer, RemoteSimulationClient, ServerConfig, SimulationBackend};
use quanta_domain::{GrowthModelKind, SimulationRequest};
use quanta_report::{
    InterpretationRules, PRODUCT_NAME, ReportFormatter, StrategyCodeArtifact, report_filename,
};
use quanta_simulation::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod output;

#[derive(Parser)]
#[command(name = "quanta")]
#[command(about = "Monte Carlo simulation of trading strategy outcomes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation locally and print the results
    Simulate {
        #[command(flatten)]
        sim: SimulationArgs,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Print the API response JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Run a simulation and write the text report
    Report {
        #[command(flatten)]
        sim: SimulationArgs,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Directory the report is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Start the HTTP API
    Serve {
        /// Port to listen on (overrides QUANTA_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run a simulation on a remote API instance
    Remote {
        /// Base URL of the remote instance
        #[arg(long, default_value = "http://localhost:5000")]
        url: String,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,

        #[command(flatten)]
        sim: SimulationArgs,
    },
    /// Write the default strategy source for a ticker
    StrategyCode {
        /// Ticker symbol
        #[arg(short, long)]
        ticker: String,

        /// Strategy description
        #[arg(short, long, default_value = "Simple long position - buy and hold")]
        description: String,

        /// Directory to write to; prints to stdout when omitted
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Args, Clone)]
struct SimulationArgs {
    /// Ticker symbol (e.g., AAPL, BTC-USD, SPY)
    #[arg(short, long, default_value = "AAPL")]
    ticker: String,

    /// Strategy description
    #[arg(short, long, default_value = "Simple long position - buy and hold")]
    description: String,

    /// Horizon in years
    #[arg(short, long, default_value_t = 5)]
    years: u32,

    /// Starting capital
    #[arg(short, long, default_value_t = 10_000.0)]
    initial: f64,

    /// Number of simulated paths
    #[arg(short = 'n', long, default_value_t = 1000)]
    simulations: u32,

    /// Periods per year (12 = monthly)
    #[arg(long, default_value_t = 12)]
    periods_per_year: u32,

    /// Seed for reproducible results
    #[arg(long)]
    seed: Option<u64>,

    /// Growth model
    #[arg(long, value_enum, default_value_t = ModelArg::Gbm)]
    model: ModelArg,
}

impl SimulationArgs {
    fn to_request(&self) -> SimulationRequest {
        let mut request = SimulationRequest::new(
            self.ticker.trim(),
            self.description.clone(),
            self.years,
            self.initial,
            self.simulations,
        )
        .with_periods_per_year(self.periods_per_year)
        .with_model(self.model.into());
        if let Some(seed) = self.seed {
            request = request.with_seed(seed);
        }
        request
    }
}

#[derive(Args, Clone)]
struct AnalysisArgs {
    /// Annual risk-free rate for the Sharpe ratio
    #[arg(long, default_value_t = 0.0)]
    risk_free_rate: f64,

    /// Path(s) the maximum drawdown is measured on
    #[arg(long, value_enum, default_value_t = DrawdownArg::Median)]
    drawdown: DrawdownArg,

    /// Probability cone construction
    #[arg(long, value_enum, default_value_t = ConeArg::Empirical)]
    cone: ConeArg,

    /// Histogram bucket width in ROI percentage points
    #[arg(long, default_value_t = DEFAULT_BUCKET_WIDTH_PCT)]
    bucket_width: f64,
}

impl AnalysisArgs {
    fn engine(&self) -> SimulationEngine {
        SimulationEngine::new()
            .with_risk_free_rate(self.risk_free_rate)
            .with_drawdown_policy(self.drawdown.into())
            .with_cone_method(self.cone.into())
            .with_bucket_width(self.bucket_width)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelArg {
    /// Geometric Brownian motion
    Gbm,
    /// Compounding trend with uniform noise
    TrendNoise,
    /// Compounding trend, no noise
    Deterministic,
}

impl From<ModelArg> for GrowthModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Gbm => Self::GeometricBrownian,
            ModelArg::TrendNoise => Self::TrendNoise,
            ModelArg::Deterministic => Self::Deterministic,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DrawdownArg {
    Median,
    Worst,
    Average,
}

impl From<DrawdownArg> for DrawdownPolicy {
    fn from(arg: DrawdownArg) -> Self {
        match arg {
            DrawdownArg::Median => Self::MedianPath,
            DrawdownArg::Worst => Self::WorstPath,
            DrawdownArg::Average => Self::AverageOfPaths,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ConeArg {
    /// Cross-sectional percentiles
    Empirical,
    /// Fixed fractions of the mean
    Fixed,
}

impl From<ConeArg> for ConeMethod {
    fn from(arg: ConeArg) -> Self {
        match arg {
            ConeArg::Empirical => Self::Empirical,
            ConeArg::Fixed => Self::FixedMultiplier(ConeMultipliers::default()),
        }
    }
}

async fn run_local(sim: &SimulationArgs, analysis: &AnalysisArgs) -> Result<SimulationOutcome> {
    let request = sim.to_request();
    let engine = analysis.engine();
    println!(
        "🚀 Simulating {} paths of {} over {} years...",
        request.num_simulations, request.ticker, request.years
    );
    let outcome = tokio::task::spawn_blocking(move || engine.run(&request))
        .await
        .context("simulation task panicked")??;
    Ok(outcome)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Simulate {
            sim,
            analysis,
            json,
        } => {
            let outcome = run_local(sim, analysis).await?;
            if *json {
                let response = quanta_api::models::SimulateResponse::from_outcome(
                    &outcome,
                    quanta_api::config::DEFAULT_RESPONSE_PATHS,
                    true,
                );
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                output::print_summary(&outcome.summary);
                output::print_cone(&outcome.cone, outcome.request.periods_per_year);
                output::print_distribution(&outcome.distribution);
                if let Some(seed) = outcome.seed() {
                    println!("Seed: {seed}");
                }
            }
        }
        Commands::Report {
            sim,
            analysis,
            out_dir,
        } => {
            let outcome = run_local(sim, analysis).await?;
            let now = Utc::now();
            let content = ReportFormatter::render_report(
                &outcome.summary,
                &outcome.request,
                &InterpretationRules::default(),
                now,
            );
            let path = out_dir.join(report_filename(PRODUCT_NAME, &outcome.request.ticker, now));
            std::fs::write(&path, content)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("✅ Report written to {}", path.display());
        }
        Commands::Serve { port } => {
            let mut config = ServerConfig::from_env()?;
            if let Some(port) = port {
                config = config.with_port(*port);
            }
            info!(addr = %config.addr(), "Starting API server");
            ApiServer::new(config).run().await?;
        }
        Commands::Remote {
            url,
            timeout_secs,
            sim,
        } => {
            let request = sim.to_request();
            if request.ticker.is_empty() {
                bail!("ticker must not be empty");
            }
            let client = RemoteSimulationClient::new(url.as_str(), Duration::from_secs(*timeout_secs))?;
            println!("📡 Requesting simulation from {}...", client.base_url());
            let response = client.simulate(SimulateRequest::from(&request)).await?;
            output::print_statistics(&response.statistics);
            println!("Sampled paths: {} rows", response.paths.len());
        }
        Commands::StrategyCode {
            ticker,
            description,
            out_dir,
        } => {
            let ticker = ticker.trim();
            if ticker.is_empty() {
                bail!("ticker must not be empty");
            }
            let artifact = StrategyCodeArtifact::buy_and_hold(ticker, description, Utc::now());
            match out_dir {
                Some(dir) => {
                    let path = dir.join(&artifact.file_name);
                    std::fs::write(&path, &artifact.code)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("✅ Strategy code written to {}", path.display());
                }
                None => print!("{}", artifact.code),
            }
        }
    }

    Ok(())
}
