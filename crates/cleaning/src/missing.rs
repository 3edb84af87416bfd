use serde::{Deserialize, Serialize};

use crate::error::CleaningError;
use crate::frame::{Column, Frame};

/// How gaps left in a frame are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    /// Carry the last known value forward.
    #[default]
    ForwardFill,
    /// Carry the next known value backward.
    BackwardFill,
    /// Linear interpolation by position. Leading gaps stay missing, trailing
    /// gaps repeat the last known value.
    Interpolate,
    /// Remove every row that has a missing value in any column.
    Drop,
    /// Leave the gaps in place.
    None,
}

/// Drops sparse columns, then fills or drops the remaining gaps.
///
/// With a `threshold`, every column whose fraction of missing values is
/// strictly greater than it is removed first.
pub fn remove_missing_values(
    frame: &Frame,
    method: FillMethod,
    threshold: Option<f64>,
) -> Result<Frame, CleaningError> {
    let mut frame = match threshold {
        Some(t) => drop_sparse_columns(frame, t)?,
        None => frame.clone(),
    };

    match method {
        FillMethod::ForwardFill => fill_columns(&mut frame, forward_fill),
        FillMethod::BackwardFill => fill_columns(&mut frame, backward_fill),
        FillMethod::Interpolate => fill_columns(&mut frame, interpolate),
        FillMethod::Drop => {
            let keep: Vec<bool> = (0..frame.len())
                .map(|row| frame.columns().iter().all(|c| c.values[row].is_some()))
                .collect();
            let dropped = keep.iter().filter(|k| !**k).count();
            if dropped > 0 {
                tracing::debug!(dropped, "Dropped rows with missing values");
            }
            frame = frame.select_rows(&keep);
        }
        FillMethod::None => {}
    }

    Ok(frame)
}

fn drop_sparse_columns(frame: &Frame, threshold: f64) -> Result<Frame, CleaningError> {
    if !(threshold.is_finite() && threshold >= 0.0) {
        return Err(CleaningError::InvalidParameter {
            name: "threshold",
            reason: format!("must be a non-negative fraction, got {threshold}"),
        });
    }
    if frame.is_empty() {
        return Ok(frame.clone());
    }

    let rows = frame.len() as f64;
    Ok(frame.retain_columns(|c| {
        let missing = c.values.iter().filter(|v| v.is_none()).count() as f64;
        let keep = missing / rows <= threshold;
        if !keep {
            tracing::debug!(column = %c.name, missing_pct = missing / rows, "Dropping sparse column");
        }
        keep
    }))
}

fn fill_columns(frame: &mut Frame, fill: fn(&mut [Option<f64>])) {
    let columns: Vec<Column> = frame
        .columns()
        .iter()
        .map(|c| {
            let mut values = c.values.clone();
            fill(&mut values);
            Column {
                name: c.name.clone(),
                values,
            }
        })
        .collect();
    *frame = Frame::from_parts(frame.index().to_vec(), columns);
}

fn forward_fill(values: &mut [Option<f64>]) {
    let mut last = None;
    for v in values.iter_mut() {
        match *v {
            Some(x) => last = Some(x),
            None => *v = last,
        }
    }
}

fn backward_fill(values: &mut [Option<f64>]) {
    let mut next = None;
    for v in values.iter_mut().rev() {
        match *v {
            Some(x) => next = Some(x),
            None => *v = next,
        }
    }
}

fn interpolate(values: &mut [Option<f64>]) {
    let mut prev: Option<(usize, f64)> = None;
    for i in 0..values.len() {
        let Some(current) = values[i] else { continue };
        if let Some((j, start)) = prev {
            let span = (i - j) as f64;
            for (k, slot) in values.iter_mut().enumerate().take(i).skip(j + 1) {
                *slot = Some(start + (current - start) * (k - j) as f64 / span);
            }
        }
        prev = Some((i, current));
    }

    if let Some((j, last)) = prev {
        for slot in values.iter_mut().skip(j + 1) {
            *slot = Some(last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn frame(columns: &[(&str, Vec<Option<f64>>)]) -> Frame {
        let len = columns[0].1.len();
        let mut frame = Frame::new((0..len as i64).map(day).collect()).unwrap();
        for (name, values) in columns {
            frame = frame.with_column(*name, values.clone()).unwrap();
        }
        frame
    }

    #[test]
    fn test_forward_fill_keeps_leading_gap() {
        let f = frame(&[("x", vec![None, Some(1.0), None, None, Some(4.0)])]);
        let out = remove_missing_values(&f, FillMethod::ForwardFill, None).unwrap();
        assert_eq!(out.column("x").unwrap(), &[None, Some(1.0), Some(1.0), Some(1.0), Some(4.0)]);
    }

    #[test]
    fn test_backward_fill_keeps_trailing_gap() {
        let f = frame(&[("x", vec![None, Some(1.0), None, Some(4.0), None])]);
        let out = remove_missing_values(&f, FillMethod::BackwardFill, None).unwrap();
        assert_eq!(out.column("x").unwrap(), &[Some(1.0), Some(1.0), Some(4.0), Some(4.0), None]);
    }

    #[test]
    fn test_interpolate_linear_by_position() {
        let f = frame(&[("x", vec![None, Some(1.0), None, None, Some(4.0), None])]);
        let out = remove_missing_values(&f, FillMethod::Interpolate, None).unwrap();
        assert_eq!(
            out.column("x").unwrap(),
            &[None, Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(4.0)]
        );
    }

    #[test]
    fn test_drop_removes_incomplete_rows() {
        let f = frame(&[
            ("a", vec![Some(1.0), None, Some(3.0)]),
            ("b", vec![Some(1.0), Some(2.0), None]),
        ]);
        let out = remove_missing_values(&f, FillMethod::Drop, None).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.index(), &[day(0)]);
    }

    #[test]
    fn test_threshold_drops_sparse_columns() {
        let f = frame(&[
            ("dense", vec![Some(1.0), Some(2.0), None, Some(4.0)]),
            ("sparse", vec![None, None, None, Some(4.0)]),
        ]);
        let out = remove_missing_values(&f, FillMethod::None, Some(0.5)).unwrap();
        assert_eq!(out.column_names(), vec!["dense"]);

        // exactly at the threshold is kept
        let out = remove_missing_values(&f, FillMethod::None, Some(0.75)).unwrap();
        assert_eq!(out.column_names(), vec!["dense", "sparse"]);
    }

    #[test]
    fn test_threshold_must_be_valid() {
        let f = frame(&[("x", vec![Some(1.0)])]);
        assert!(matches!(
            remove_missing_values(&f, FillMethod::None, Some(-0.1)).unwrap_err(),
            CleaningError::InvalidParameter { name: "threshold", .. }
        ));
    }
}
