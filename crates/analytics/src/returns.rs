//! Price-to-return transforms and return summaries.

use core_types::{Observation, PriceSeries, ReturnKind, ReturnSeries, TimeSeries};

use crate::error::AnalyticsError;
use crate::stats;
use crate::validation::{require_len, require_periods};

/// Period-over-period simple returns, `(p[i] - p[i-1]) / p[i-1]`.
///
/// The first price is consumed as the baseline, so the result is one entry
/// shorter and each return carries the timestamp of the later price.
///
/// # Errors
///
/// * `InsufficientData` if fewer than two prices are given.
/// * `InvalidInput` if a baseline price is zero (the return is undefined).
pub fn simple_returns(prices: &PriceSeries) -> Result<ReturnSeries, AnalyticsError> {
    require_len("simple_returns", prices.len(), 2)?;

    let points = prices
        .as_slice()
        .windows(2)
        .map(|pair| {
            let (prev, curr) = (pair[0], pair[1]);
            if prev.value == 0.0 {
                return Err(AnalyticsError::InvalidInput {
                    metric: "simple_returns",
                    reason: format!("price at {} is zero", prev.timestamp),
                });
            }
            Ok(Observation::new(
                curr.timestamp,
                (curr.value - prev.value) / prev.value,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TimeSeries::new(points)?)
}

/// Period-over-period log returns, `ln(p[i] / p[i-1])`.
///
/// # Errors
///
/// * `InsufficientData` if fewer than two prices are given.
/// * `InvalidInput` if any price is zero or negative.
pub fn log_returns(prices: &PriceSeries) -> Result<ReturnSeries, AnalyticsError> {
    require_len("log_returns", prices.len(), 2)?;

    if let Some(bad) = prices.iter().find(|p| p.value <= 0.0) {
        return Err(AnalyticsError::InvalidInput {
            metric: "log_returns",
            reason: format!("price at {} is not positive: {}", bad.timestamp, bad.value),
        });
    }

    let points = prices
        .as_slice()
        .windows(2)
        .map(|pair| Observation::new(pair[1].timestamp, (pair[1].value / pair[0].value).ln()))
        .collect();

    Ok(TimeSeries::new(points)?)
}

/// Derives returns of the requested kind.
pub fn returns(prices: &PriceSeries, kind: ReturnKind) -> Result<ReturnSeries, AnalyticsError> {
    match kind {
        ReturnKind::Simple => simple_returns(prices),
        ReturnKind::Log => log_returns(prices),
    }
}

/// Compounded growth from the start of the series through each entry:
/// the running product of `(1 + r)`, minus one.
///
/// The first output corresponds to the first return; no zero baseline is
/// prepended. An empty input yields an empty output.
pub fn cumulative_returns(returns: &ReturnSeries) -> Result<TimeSeries, AnalyticsError> {
    let mut wealth = 1.0_f64;
    let points = returns
        .iter()
        .map(|r| {
            wealth *= 1.0 + r.value;
            Observation::new(r.timestamp, wealth - 1.0)
        })
        .collect();

    Ok(TimeSeries::new(points)?)
}

/// Total compounded return over the whole series.
pub fn total_return(returns: &ReturnSeries) -> Result<f64, AnalyticsError> {
    require_len("total_return", returns.len(), 1)?;
    Ok(returns.iter().fold(1.0, |acc, r| acc * (1.0 + r.value)) - 1.0)
}

/// `(1 + mean(returns))^periods_per_year - 1`.
///
/// Compounds the arithmetic mean of the per-period returns, not the
/// geometric mean.
///
/// # Errors
///
/// * `InvalidParameter` if `periods_per_year` is zero.
/// * `InsufficientData` on an empty series.
pub fn annualized_return(
    returns: &ReturnSeries,
    periods_per_year: u32,
) -> Result<f64, AnalyticsError> {
    require_periods(periods_per_year)?;
    require_len("annualized_return", returns.len(), 1)?;

    let mean = stats::mean(&returns.values());
    Ok((1.0 + mean).powf(periods_per_year as f64) - 1.0)
}
