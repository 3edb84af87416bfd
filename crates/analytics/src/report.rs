use core_types::{Observation, PriceSeries, ReturnSeries, SparseSeries, TimeSeries};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::params::RiskParameters;
use crate::returns::{annualized_return, cumulative_returns, simple_returns};
use crate::risk::{
    cvar, drawdown_series, max_drawdown, realized_volatility, rolling_volatility, sharpe_ratio, var,
};

/// The full set of risk metrics for one return series.
///
/// This is what a single-ticker metrics panel displays: every figure is a
/// plain fraction (0.05 = 5%) and formatting is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    // I. Performance
    pub annualized_return: f64,

    // II. Dispersion
    pub volatility: f64,
    pub sharpe_ratio: Option<f64>, // Option<> for series with no dispersion

    // III. Drawdown and Tail Risk
    pub max_drawdown: f64,
    pub var: f64,
    pub cvar: f64,

    // IV. Inputs
    pub confidence_level: f64,
    pub observations: usize,
}

impl RiskReport {
    /// Computes every metric with the given parameters.
    ///
    /// A zero-dispersion series is reported with `sharpe_ratio: None`; every
    /// other failure propagates unchanged.
    pub fn compute(
        returns: &ReturnSeries,
        params: &RiskParameters,
    ) -> Result<Self, AnalyticsError> {
        params.validate()?;

        let report = Self {
            annualized_return: annualized_return(returns, params.periods_per_year)?,
            volatility: realized_volatility(returns, params.periods_per_year)?,
            sharpe_ratio: sharpe_or_none(returns, params)?,
            max_drawdown: max_drawdown(returns)?,
            var: var(returns, params.confidence_level)?,
            cvar: cvar(returns, params.confidence_level)?,
            confidence_level: params.confidence_level,
            observations: returns.len(),
        };

        tracing::debug!(
            observations = report.observations,
            annualized_return = report.annualized_return,
            volatility = report.volatility,
            max_drawdown = report.max_drawdown,
            "Computed risk report"
        );
        Ok(report)
    }
}

/// A risk report together with the two series charted next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskProfile {
    pub report: RiskReport,
    pub rolling_volatility: SparseSeries,
    pub drawdown: TimeSeries,
}

impl RiskProfile {
    /// A series shorter than the rolling window still gets a report; its
    /// rolling volatility is then missing at every timestamp.
    pub fn compute(
        returns: &ReturnSeries,
        params: &RiskParameters,
    ) -> Result<Self, AnalyticsError> {
        let report = RiskReport::compute(returns, params)?;
        let rolling = if returns.len() < params.rolling_window {
            tracing::debug!(
                observations = returns.len(),
                window = params.rolling_window,
                "Series is shorter than the rolling window"
            );
            returns
                .iter()
                .map(|o| Observation::new(o.timestamp, None))
                .collect()
        } else {
            rolling_volatility(returns, params.rolling_window, params.periods_per_year)?
                .collect_series()
        };
        let drawdown = drawdown_series(returns)?;

        Ok(Self {
            report,
            rolling_volatility: rolling,
            drawdown,
        })
    }
}

/// The four headline figures used to rank tickers side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub annualized_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: f64,
}

impl PerformanceSummary {
    pub fn compute(
        returns: &ReturnSeries,
        params: &RiskParameters,
    ) -> Result<Self, AnalyticsError> {
        Ok(Self {
            annualized_return: annualized_return(returns, params.periods_per_year)?,
            volatility: realized_volatility(returns, params.periods_per_year)?,
            sharpe_ratio: sharpe_or_none(returns, params)?,
            max_drawdown: max_drawdown(returns)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerPerformance {
    pub ticker: String,
    pub summary: PerformanceSummary,
    pub cumulative_returns: TimeSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: String,
}

/// Side-by-side performance of several tickers.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Comparison {
    pub rows: Vec<TickerPerformance>,
    pub skipped: Vec<SkippedTicker>,
}

/// Summarizes every `(ticker, prices)` pair from its simple returns.
///
/// A ticker whose series cannot be summarized (too short, a zero price, ...)
/// is recorded in `skipped` and the rest carry on. Invalid parameters fail the
/// whole comparison, since they would fail every ticker alike.
pub fn compare(
    prices: &[(String, PriceSeries)],
    params: &RiskParameters,
) -> Result<Comparison, AnalyticsError> {
    params.validate()?;

    let mut comparison = Comparison::default();
    for (ticker, series) in prices {
        match summarize_ticker(series, params) {
            Ok((summary, cumulative)) => comparison.rows.push(TickerPerformance {
                ticker: ticker.clone(),
                summary,
                cumulative_returns: cumulative,
            }),
            Err(e) => {
                tracing::warn!(ticker = %ticker, error = %e, "Skipping ticker in comparison");
                comparison.skipped.push(SkippedTicker {
                    ticker: ticker.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok(comparison)
}

fn summarize_ticker(
    prices: &PriceSeries,
    params: &RiskParameters,
) -> Result<(PerformanceSummary, TimeSeries), AnalyticsError> {
    let returns = simple_returns(prices)?;
    let summary = PerformanceSummary::compute(&returns, params)?;
    let cumulative = cumulative_returns(&returns)?;
    Ok((summary, cumulative))
}

fn sharpe_or_none(
    returns: &ReturnSeries,
    params: &RiskParameters,
) -> Result<Option<f64>, AnalyticsError> {
    match sharpe_ratio(returns, params.risk_free_rate, params.periods_per_year) {
        Ok(value) => Ok(Some(value)),
        Err(AnalyticsError::DivisionByZero(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
