//! Headline quote figures and the distribution of returns for one ticker.

use core_types::{PriceSeries, ReturnSeries};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::validation::require_len;

/// Bin count used when the caller has no preference.
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// The latest close and its move from the close before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub last_close: f64,
    pub previous_close: f64,
    /// `last_close - previous_close`, in price units.
    pub change: f64,
    /// `change / previous_close` as a fraction.
    pub change_pct: f64,
    pub last_volume: Option<f64>,
    pub observations: usize,
}

impl PriceSummary {
    /// # Errors
    ///
    /// * `InsufficientData` for fewer than two prices.
    /// * `InvalidInput` if the previous close is zero.
    pub fn compute(
        prices: &PriceSeries,
        last_volume: Option<f64>,
    ) -> Result<Self, AnalyticsError> {
        require_len("price_summary", prices.len(), 2)?;

        let points = prices.as_slice();
        let (previous, last) = (points[points.len() - 2], points[points.len() - 1]);
        if previous.value == 0.0 {
            return Err(AnalyticsError::InvalidInput {
                metric: "price_summary",
                reason: format!("price at {} is zero", previous.timestamp),
            });
        }

        let change = last.value - previous.value;
        Ok(Self {
            last_close: last.value,
            previous_close: previous.value,
            change,
            change_pct: change / previous.value,
            last_volume,
            observations: prices.len(),
        })
    }
}

/// One equal-width bucket of a histogram. `upper` is exclusive except on
/// the last bin, which also holds the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Counts returns in `bins` equal-width buckets spanning `[min, max]`.
///
/// A series whose returns are all identical has no width to split and
/// yields a single bin holding every observation.
///
/// # Errors
///
/// * `InvalidParameter` if `bins` is zero.
/// * `InsufficientData` on an empty series.
pub fn return_histogram(
    returns: &ReturnSeries,
    bins: usize,
) -> Result<Vec<HistogramBin>, AnalyticsError> {
    if bins == 0 {
        return Err(AnalyticsError::InvalidParameter {
            name: "bins",
            reason: "must be at least 1".to_string(),
        });
    }
    require_len("return_histogram", returns.len(), 1)?;

    let values = returns.values();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return Ok(vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }]);
    }

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for value in values {
        let slot = (((value - min) / width).floor() as usize).min(bins - 1);
        histogram[slot].count += 1;
    }
    Ok(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use core_types::TimeSeries;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn series(values: &[f64]) -> TimeSeries {
        TimeSeries::from_pairs(values.iter().enumerate().map(|(i, v)| (day(i as i64), *v))).unwrap()
    }

    #[test]
    fn test_price_summary_uses_last_two_closes() {
        let summary = PriceSummary::compute(&series(&[90.0, 100.0, 98.0]), Some(1_500.0)).unwrap();
        assert_eq!(summary.last_close, 98.0);
        assert_eq!(summary.previous_close, 100.0);
        assert!((summary.change + 2.0).abs() < 1e-12);
        assert!((summary.change_pct + 0.02).abs() < 1e-12);
        assert_eq!(summary.last_volume, Some(1_500.0));
        assert_eq!(summary.observations, 3);
    }

    #[test]
    fn test_price_summary_needs_two_prices() {
        let err = PriceSummary::compute(&series(&[100.0]), None).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData { required: 2, actual: 1, .. }));

        let err = PriceSummary::compute(&series(&[0.0, 1.0]), None).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput { .. }));
    }

    #[test]
    fn test_histogram_counts_every_return() {
        let returns = series(&[-0.02, -0.015, 0.002, 0.004, 0.012, 0.02]);
        let histogram = return_histogram(&returns, 4).unwrap();

        assert_eq!(histogram.len(), 4);
        assert_eq!(histogram[0].lower, -0.02);
        assert_eq!(histogram[3].upper, 0.02);
        // the maximum lands in the last bin
        assert_eq!(
            histogram.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![2, 0, 2, 2]
        );
    }

    #[test]
    fn test_histogram_of_identical_returns_is_one_bin() {
        let histogram = return_histogram(&series(&[0.01, 0.01, 0.01]), 10).unwrap();
        assert_eq!(histogram, vec![HistogramBin { lower: 0.01, upper: 0.01, count: 3 }]);
    }

    #[test]
    fn test_histogram_rejects_bad_input() {
        assert!(matches!(
            return_histogram(&series(&[0.01]), 0).unwrap_err(),
            AnalyticsError::InvalidParameter { name: "bins", .. }
        ));
        assert!(matches!(
            return_histogram(&series(&[]), 5).unwrap_err(),
            AnalyticsError::InsufficientData { .. }
        ));
    }
}
