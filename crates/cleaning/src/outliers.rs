use analytics::stats;
use serde::{Deserialize, Serialize};

use crate::error::CleaningError;
use crate::frame::Frame;

/// Default multiplier for both the IQR fences and the z-score cut-off.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    /// Keep `Q1 - t*IQR <= x <= Q3 + t*IQR`.
    Iqr,
    /// Keep `|x - mean| / std < t`.
    ///
    /// A column with zero deviation keeps every row. Treating `0 / 0` as a
    /// failed test would instead empty the frame on any flat price history.
    #[serde(rename = "zscore")]
    ZScore,
    /// Keep every row.
    #[default]
    None,
}

/// Removes every row in which any selected column is an outlier.
///
/// `columns = None` selects every column. Statistics are computed over the
/// non-missing values of each column; a missing value never passes the test,
/// so its row is removed. A column with zero deviation has no z-score
/// outliers. `OutlierMethod::None` returns the frame unchanged.
pub fn remove_outliers(
    frame: &Frame,
    method: OutlierMethod,
    threshold: f64,
    columns: Option<&[&str]>,
) -> Result<Frame, CleaningError> {
    if !(threshold.is_finite() && threshold >= 0.0) {
        return Err(CleaningError::InvalidParameter {
            name: "threshold",
            reason: format!("must be a non-negative number, got {threshold}"),
        });
    }

    let selected: Vec<&str> = match columns {
        Some(names) => names.to_vec(),
        None => frame.column_names(),
    };

    let mut keep = vec![true; frame.len()];
    for name in selected {
        let values = frame
            .column(name)
            .ok_or_else(|| CleaningError::UnknownColumn(name.to_string()))?;
        if method == OutlierMethod::None {
            continue;
        }
        let passes = column_filter(values, method, threshold);
        for (k, v) in keep.iter_mut().zip(values) {
            *k = *k && v.is_some_and(|x| passes(x));
        }
    }

    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        tracing::debug!(removed, ?method, threshold, "Removed outlier rows");
    }
    Ok(frame.select_rows(&keep))
}

fn column_filter(
    values: &[Option<f64>],
    method: OutlierMethod,
    threshold: f64,
) -> Box<dyn Fn(f64) -> bool> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();

    match method {
        OutlierMethod::Iqr => {
            let (Some(q1), Some(q3)) = (stats::quantile(&present, 0.25), stats::quantile(&present, 0.75))
            else {
                return Box::new(|_| false);
            };
            let iqr = q3 - q1;
            let (lower, upper) = (q1 - threshold * iqr, q3 + threshold * iqr);
            Box::new(move |x| x >= lower && x <= upper)
        }
        OutlierMethod::ZScore => {
            let Some(std) = stats::sample_std(&present) else {
                return Box::new(|_| false);
            };
            if std == 0.0 {
                return Box::new(|_| true);
            }
            let mean = stats::mean(&present);
            Box::new(move |x| ((x - mean) / std).abs() < threshold)
        }
        OutlierMethod::None => Box::new(|_| true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn frame(values: &[Option<f64>]) -> Frame {
        Frame::new((0..values.len() as i64).map(day).collect())
            .unwrap()
            .with_column("x", values.to_vec())
            .unwrap()
    }

    #[test]
    fn test_iqr_removes_spike() {
        let f = frame(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(100.0)]);
        // Q1 = 2, Q3 = 4, IQR = 2, fences at -4 and 10
        let out = remove_outliers(&f, OutlierMethod::Iqr, 3.0, None).unwrap();
        assert_eq!(out.len(), 4);
        assert!(!out.column("x").unwrap().contains(&Some(100.0)));
    }

    #[test]
    fn test_iqr_fences_are_inclusive() {
        let f = frame(&[Some(1.0), Some(2.0), Some(3.0)]);
        // Q1 = 1.5, Q3 = 2.5, zero multiplier: fences equal the quartiles
        let out = remove_outliers(&f, OutlierMethod::Iqr, 0.0, None).unwrap();
        assert_eq!(out.column("x").unwrap(), &[Some(2.0)]);
    }

    #[test]
    fn test_zscore_uses_strict_bound() {
        let values: Vec<Option<f64>> = (0..20).map(|i| Some(if i == 19 { 50.0 } else { 1.0 + i as f64 % 3.0 })).collect();
        let out = remove_outliers(&frame(&values), OutlierMethod::ZScore, 3.0, None).unwrap();
        assert_eq!(out.len(), 19);
    }

    #[test]
    fn test_zscore_constant_column_keeps_all() {
        let f = frame(&[Some(2.0), Some(2.0), Some(2.0)]);
        assert_eq!(remove_outliers(&f, OutlierMethod::ZScore, 3.0, None).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_values_are_removed() {
        let f = frame(&[Some(1.0), None, Some(2.0), Some(3.0)]);
        let out = remove_outliers(&f, OutlierMethod::Iqr, 3.0, None).unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_method_none_keeps_everything() {
        let f = frame(&[Some(1.0), None, Some(1e9)]);
        assert_eq!(remove_outliers(&f, OutlierMethod::None, 3.0, None).unwrap(), f);
    }

    #[test]
    fn test_unknown_column() {
        let f = frame(&[Some(1.0)]);
        assert_eq!(
            remove_outliers(&f, OutlierMethod::Iqr, 3.0, Some(&["close"])).unwrap_err(),
            CleaningError::UnknownColumn("close".to_string())
        );
    }
}
