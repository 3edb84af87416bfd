//! Dispersion and tail-risk measures over a return series.

use core_types::{Observation, ReturnSeries, SparseSeries, TimeSeries};

use crate::error::AnalyticsError;
use crate::stats;
use crate::validation::{
    require_confidence, require_finite, require_len, require_periods, require_window,
};

/// Sample standard deviation of the returns (divisor `n - 1`), scaled by
/// `sqrt(periods_per_year)`.
///
/// # Errors
///
/// * `InvalidParameter` if `periods_per_year` is zero.
/// * `InsufficientData` for fewer than two observations.
pub fn realized_volatility(
    returns: &ReturnSeries,
    periods_per_year: u32,
) -> Result<f64, AnalyticsError> {
    require_periods(periods_per_year)?;
    require_len("realized_volatility", returns.len(), 2)?;

    let std = stats::sample_std(&returns.values()).unwrap_or(0.0);
    Ok(std * (periods_per_year as f64).sqrt())
}

/// A lazy, restartable rolling-volatility sequence.
///
/// Yields exactly one observation per input return. The first `window - 1`
/// positions carry `None`; each later position carries the annualized sample
/// standard deviation of the trailing `window` returns. A clone is an
/// independent cursor over the same input.
#[derive(Debug, Clone)]
pub struct RollingVolatility<'a> {
    returns: &'a [Observation],
    window: usize,
    scale: f64,
    position: usize,
}

impl RollingVolatility<'_> {
    /// Materializes the remaining positions into a sparse series.
    pub fn collect_series(self) -> SparseSeries {
        self.collect()
    }
}

impl Iterator for RollingVolatility<'_> {
    type Item = Observation<Option<f64>>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.returns.get(self.position)?;
        let end = self.position + 1;
        self.position = end;

        let value = if end >= self.window {
            let trailing: Vec<f64> = self.returns[end - self.window..end]
                .iter()
                .map(|o| o.value)
                .collect();
            // A one-observation window has no sample deviation.
            stats::sample_std(&trailing).map(|std| std * self.scale)
        } else {
            None
        };

        Some(Observation::new(current.timestamp, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.returns.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RollingVolatility<'_> {}

/// Rolling annualized volatility over a trailing window.
///
/// All validation happens here, before any value is produced.
///
/// # Errors
///
/// * `InvalidParameter` if `window` or `periods_per_year` is zero.
/// * `InsufficientData` if `window` exceeds the number of returns.
pub fn rolling_volatility(
    returns: &ReturnSeries,
    window: usize,
    periods_per_year: u32,
) -> Result<RollingVolatility<'_>, AnalyticsError> {
    require_window(window)?;
    require_periods(periods_per_year)?;
    require_len("rolling_volatility", returns.len(), window)?;

    Ok(RollingVolatility {
        returns: returns.as_slice(),
        window,
        scale: (periods_per_year as f64).sqrt(),
        position: 0,
    })
}

/// Annualized Sharpe ratio:
/// `sqrt(ppy) * mean(r - risk_free_rate / ppy) / std(r)`.
///
/// The deviation is taken over the raw returns, not the excess returns.
///
/// # Errors
///
/// * `InvalidParameter` if `periods_per_year` is zero or the rate is not finite.
/// * `InsufficientData` for fewer than two observations.
/// * `DivisionByZero` if every return is identical (zero deviation).
pub fn sharpe_ratio(
    returns: &ReturnSeries,
    risk_free_rate: f64,
    periods_per_year: u32,
) -> Result<f64, AnalyticsError> {
    require_periods(periods_per_year)?;
    require_finite("risk_free_rate", risk_free_rate)?;
    require_len("sharpe_ratio", returns.len(), 2)?;

    let values = returns.values();
    let std = stats::sample_std(&values).unwrap_or(0.0);
    if std == 0.0 {
        return Err(AnalyticsError::DivisionByZero("sharpe_ratio"));
    }

    let ppy = periods_per_year as f64;
    let per_period_rf = risk_free_rate / ppy;
    let excess_mean = stats::mean(&values) - per_period_rf;

    Ok(ppy.sqrt() * excess_mean / std)
}

/// Drawdown at every point of the compounded wealth index.
///
/// The wealth index is the running product of `(1 + r)`; each drawdown is
/// `(wealth - running_max) / running_max` with the running maximum taken over
/// the index so far, the current point included. Values are always `<= 0`.
///
/// # Errors
///
/// * `InsufficientData` on an empty series.
/// * `InvalidInput` if the wealth index never rises above zero.
pub fn drawdown_series(returns: &ReturnSeries) -> Result<TimeSeries, AnalyticsError> {
    require_len("drawdown_series", returns.len(), 1)?;

    let mut wealth = 1.0_f64;
    let mut peak = f64::NEG_INFINITY;
    let mut points = Vec::with_capacity(returns.len());

    for r in returns {
        wealth *= 1.0 + r.value;
        peak = peak.max(wealth);
        if peak <= 0.0 {
            return Err(AnalyticsError::InvalidInput {
                metric: "drawdown_series",
                reason: format!("wealth index is not positive at {}", r.timestamp),
            });
        }
        points.push(Observation::new(r.timestamp, (wealth - peak) / peak));
    }

    Ok(TimeSeries::new(points)?)
}

/// The most negative drawdown over the whole series (`<= 0`).
///
/// # Errors
///
/// Same as [`drawdown_series`].
pub fn max_drawdown(returns: &ReturnSeries) -> Result<f64, AnalyticsError> {
    let drawdowns = drawdown_series(returns)?;
    Ok(drawdowns.iter().map(|d| d.value).fold(0.0, f64::min))
}

/// Historical Value-at-Risk: the empirical `confidence_level` quantile of the
/// returns, linearly interpolated between order statistics.
///
/// # Errors
///
/// * `InvalidParameter` unless `0 < confidence_level < 1`.
/// * `InsufficientData` on an empty series.
pub fn var(returns: &ReturnSeries, confidence_level: f64) -> Result<f64, AnalyticsError> {
    require_confidence(confidence_level)?;
    require_len("var", returns.len(), 1)?;

    let mut sorted = returns.values();
    sorted.sort_by(f64::total_cmp);
    Ok(stats::quantile_sorted(&sorted, confidence_level))
}

/// Conditional VaR (expected shortfall): the mean of every return at or below
/// the VaR threshold for the same confidence level.
///
/// Because the interpolated quantile never falls below the sample minimum, the
/// tail always holds at least one observation. Should it ever be empty, the
/// single nearest observation (the minimum) is used.
///
/// # Errors
///
/// Same as [`var`].
pub fn cvar(returns: &ReturnSeries, confidence_level: f64) -> Result<f64, AnalyticsError> {
    require_confidence(confidence_level)?;
    require_len("cvar", returns.len(), 1)?;

    let mut sorted = returns.values();
    sorted.sort_by(f64::total_cmp);
    let threshold = stats::quantile_sorted(&sorted, confidence_level);

    let tail: Vec<f64> = sorted.iter().copied().take_while(|r| *r <= threshold).collect();
    if tail.is_empty() {
        tracing::debug!(threshold, "CVaR tail is empty, falling back to the sample minimum");
        return Ok(sorted[0]);
    }
    Ok(stats::mean(&tail))
}
