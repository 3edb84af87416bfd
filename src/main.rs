use analytics::{
    DEFAULT_HISTOGRAM_BINS, PriceSummary, RiskProfile, RiskReport, cumulative_returns,
    return_histogram, returns, simple_returns,
};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cleaning::Frequency;
use configuration::{AnalyticsOverrides, Config, DataConfig, LoggingConfig, SourceKind};
use core_types::ReturnKind;
use data_source::{DateRange, JsonFileSource, PriceSource};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod pipeline;
mod render;

/// The main entry point for the quantdash analytics CLI.
fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;

    // Held until exit so buffered log lines are flushed.
    let _guard = init_tracing(&config.logging)?;
    let source = build_source(&config.data);
    tracing::debug!(source = source.name(), "Using price source");

    // Execute the appropriate command
    match cli.command {
        Commands::Risk(args) => handle_risk(args, &config, source.as_ref()),
        Commands::Compare(args) => handle_compare(args, &config, source.as_ref()),
        Commands::Returns(args) => handle_returns(args, &config, source.as_ref()),
        Commands::Summary(args) => handle_summary(args, &config, source.as_ref()),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Return and risk analytics for equity price histories.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file to read instead of `config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full set of risk metrics for one ticker.
    Risk(RiskArgs),
    /// Rank several tickers side by side.
    Compare(CompareArgs),
    /// Print a return series as JSON.
    Returns(ReturnsArgs),
    /// Show the latest close, its daily change and the return distribution.
    Summary(SummaryArgs),
}

#[derive(Parser)]
struct PeriodArgs {
    /// First date to include (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last date to include (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl PeriodArgs {
    fn range(&self) -> Result<DateRange> {
        Ok(DateRange::new(self.from, self.to)?)
    }
}

#[derive(Parser)]
struct RiskArgs {
    /// The ticker to analyze (e.g., "AAPL").
    #[arg(long)]
    ticker: String,

    #[command(flatten)]
    period: PeriodArgs,

    #[command(flatten)]
    overrides: AnalyticsOverrides,

    /// Downsample before computing returns (D, W, M, Q or Y).
    #[arg(long)]
    resample: Option<Frequency>,

    /// Print the report and its chart series as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct CompareArgs {
    /// Comma-separated tickers (e.g., "AAPL,MSFT,GOOGL").
    #[arg(long, value_delimiter = ',', required = true)]
    tickers: Vec<String>,

    #[command(flatten)]
    period: PeriodArgs,

    #[command(flatten)]
    overrides: AnalyticsOverrides,

    /// Print the comparison as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ReturnsArgs {
    #[arg(long)]
    ticker: String,

    #[command(flatten)]
    period: PeriodArgs,

    /// Period return definition: simple or log.
    #[arg(long, default_value_t = ReturnKind::Simple)]
    kind: ReturnKind,

    /// Print the compounded return since the first price instead.
    #[arg(long, conflicts_with = "kind")]
    cumulative: bool,
}

#[derive(Parser)]
struct SummaryArgs {
    #[arg(long)]
    ticker: String,

    #[command(flatten)]
    period: PeriodArgs,

    /// Number of equal-width bins in the return histogram.
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    bins: usize,

    /// Print the summary and histogram as JSON.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Setup
// ==============================================================================

/// Logs go to stderr through a non-blocking writer so stdout stays clean for
/// JSON output. `RUST_LOG` overrides the configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<WorkerGuard> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("Invalid log level '{}'", logging.level))?,
    };

    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install the log subscriber: {e}"))?;
    Ok(guard)
}

fn build_source(data: &DataConfig) -> Box<dyn PriceSource> {
    match data.source {
        SourceKind::Json => Box::new(JsonFileSource::new(&data.directory)),
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_risk(args: RiskArgs, config: &Config, source: &dyn PriceSource) -> Result<()> {
    let mut params = args.overrides.apply(&config.analytics);
    if let (Some(frequency), None) = (args.resample, args.overrides.periods_per_year) {
        params.periods_per_year = frequency.periods_per_year();
    }

    let frame = pipeline::load_frame(source, &args.ticker, args.period.range()?)?;
    let prices = pipeline::clean_prices(&frame, &config.cleaning, args.resample)
        .with_context(|| format!("Failed to clean {}", args.ticker))?;
    let returns = simple_returns(&prices)?;
    let context = || format!("Failed to compute risk metrics for {}", args.ticker);

    // The charted series are only needed for JSON output.
    if args.json {
        let profile = RiskProfile::compute(&returns, &params).with_context(context)?;
        tracing::info!(ticker = %args.ticker, observations = profile.report.observations, "Computed risk profile");
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        let report = RiskReport::compute(&returns, &params).with_context(context)?;
        tracing::info!(ticker = %args.ticker, observations = report.observations, "Computed risk report");
        println!("{}", render::risk_table(&args.ticker.to_uppercase(), &report));
    }
    Ok(())
}

fn handle_compare(args: CompareArgs, config: &Config, source: &dyn PriceSource) -> Result<()> {
    let params = args.overrides.apply(&config.analytics);
    let tickers: Vec<&str> = args.tickers.iter().map(|t| t.trim()).collect();

    let comparison =
        pipeline::compare_tickers(source, &tickers, args.period.range()?, &config.cleaning, &params)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    println!("{}", render::comparison_table(&comparison));
    for skipped in &comparison.skipped {
        println!("Skipped {}: {}", skipped.ticker, skipped.reason);
    }
    Ok(())
}

fn handle_returns(args: ReturnsArgs, config: &Config, source: &dyn PriceSource) -> Result<()> {
    let frame = pipeline::load_frame(source, &args.ticker, args.period.range()?)?;
    let prices = pipeline::clean_prices(&frame, &config.cleaning, None)?;

    let series = if args.cumulative {
        cumulative_returns(&simple_returns(&prices)?)?
    } else {
        returns(&prices, args.kind)?
    };

    let output = serde_json::json!({
        "ticker": args.ticker.to_uppercase(),
        "kind": if args.cumulative { "cumulative".to_string() } else { args.kind.to_string() },
        "series": series,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn handle_summary(args: SummaryArgs, config: &Config, source: &dyn PriceSource) -> Result<()> {
    let frame = pipeline::load_frame(source, &args.ticker, args.period.range()?)?;
    let prices = pipeline::clean_prices(&frame, &config.cleaning, None)
        .with_context(|| format!("Failed to clean {}", args.ticker))?;

    let summary = PriceSummary::compute(&prices, pipeline::last_volume(&frame))?;
    let histogram = return_histogram(&simple_returns(&prices)?, args.bins)?;
    tracing::info!(ticker = %args.ticker, observations = summary.observations, "Computed price summary");

    let ticker = args.ticker.to_uppercase();
    if args.json {
        let output = serde_json::json!({
            "ticker": ticker,
            "summary": summary,
            "histogram": histogram,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", render::summary_table(&ticker, &summary));
        println!("{}", render::histogram_table(&histogram));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compare_splits_tickers() {
        let cli = Cli::parse_from(["quantdash", "compare", "--tickers", "AAPL,MSFT", "--window", "10"]);
        let Commands::Compare(args) = cli.command else {
            panic!("expected the compare command");
        };
        assert_eq!(args.tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(args.overrides.window, Some(10));
    }

    #[test]
    fn test_risk_parses_resample_and_dates() {
        let cli = Cli::parse_from([
            "quantdash", "risk", "--ticker", "AAPL", "--from", "2024-01-01", "--resample", "W",
        ]);
        let Commands::Risk(args) = cli.command else {
            panic!("expected the risk command");
        };
        assert_eq!(args.resample, Some(Frequency::Weekly));
        assert_eq!(args.period.from, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_summary_defaults_to_fifty_bins() {
        let cli = Cli::parse_from(["quantdash", "summary", "--ticker", "MSFT"]);
        let Commands::Summary(args) = cli.command else {
            panic!("expected the summary command");
        };
        assert_eq!(args.bins, 50);
        assert!(!args.json);
    }

    #[test]
    fn test_cumulative_conflicts_with_explicit_kind() {
        let result = Cli::try_parse_from([
            "quantdash", "returns", "--ticker", "AAPL", "--kind", "log", "--cumulative",
        ]);
        assert!(result.is_err());
    }
}
