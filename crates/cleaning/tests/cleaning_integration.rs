//! End-to-end cleaning pipeline: klines to a complete close series.

use analytics::{RiskParameters, compare, simple_returns};
use chrono::{DateTime, Duration, TimeZone, Utc};
use cleaning::{
    AlignMethod, Aggregation, CleaningError, FillMethod, Frame, Frequency, OutlierMethod,
    align_frames, remove_missing_values, remove_outliers, resample,
};
use core_types::Kline;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

fn kline(n: i64, close: f64) -> Kline {
    let price = Decimal::from_f64(close).unwrap();
    Kline {
        open_time: day(n),
        open: price,
        high: price,
        low: price,
        close: price,
        volume: Decimal::ONE_HUNDRED,
    }
}

fn close_frame(rows: &[(i64, f64)]) -> Frame {
    let klines: Vec<Kline> = rows.iter().map(|(n, c)| kline(*n, *c)).collect();
    Frame::from_klines(&klines).unwrap()
}

#[test]
fn test_aligned_frames_fill_into_complete_series() {
    let a = close_frame(&[(0, 100.0), (1, 101.0), (2, 102.0), (3, 103.0)]);
    let b = close_frame(&[(0, 50.0), (2, 51.0), (3, 52.0)]);

    let aligned = align_frames(&[a, b], AlignMethod::Outer);
    assert!(aligned[1].series("close").is_err());

    let filled = remove_missing_values(&aligned[1], FillMethod::ForwardFill, None).unwrap();
    let series = filled.series("close").unwrap();
    assert_eq!(series.values(), vec![50.0, 50.0, 51.0, 52.0]);
    assert_eq!(series.timestamps(), aligned[0].index().to_vec());
}

#[test]
fn test_cleaned_series_feed_comparison() {
    let frames = [
        close_frame(&[(0, 10.0), (1, 11.0), (2, 10.5), (4, 11.5)]),
        close_frame(&[(0, 20.0), (1, 19.0), (3, 21.0), (4, 22.0)]),
    ];

    let prices: Vec<(String, _)> = align_frames(&frames, AlignMethod::Inner)
        .iter()
        .zip(["AAA", "BBB"])
        .map(|(f, t)| (t.to_string(), f.series("close").unwrap()))
        .collect();
    assert!(prices.iter().all(|(_, s)| s.len() == 3));

    let comparison = compare(&prices, &RiskParameters::default()).unwrap();
    assert_eq!(comparison.rows.len(), 2);
    assert!(comparison.skipped.is_empty());
}

#[test]
fn test_outliers_then_resample() {
    let mut rows: Vec<(i64, f64)> = (0..28).map(|n| (n, 100.0 + (n % 5) as f64)).collect();
    rows[10].1 = 10_000.0;
    let frame = close_frame(&rows);

    let cleaned =
        remove_outliers(&frame, OutlierMethod::Iqr, 3.0, Some(&["close"])).unwrap();
    assert_eq!(cleaned.len(), 27);

    let weekly = resample(&cleaned, Frequency::Weekly, Aggregation::Last).unwrap();
    assert_eq!(weekly.len(), 4);
    let returns = simple_returns(&weekly.series("close").unwrap()).unwrap();
    assert_eq!(returns.len(), 3);
}

#[test]
fn test_drop_then_extract() {
    let frame = Frame::new(vec![day(0), day(1), day(2)])
        .unwrap()
        .with_column("close", vec![Some(1.0), None, Some(3.0)])
        .unwrap();
    assert_eq!(
        frame.series("close").unwrap_err(),
        CleaningError::MissingValues { column: "close".to_string(), count: 1 }
    );
    let dropped = remove_missing_values(&frame, FillMethod::Drop, None).unwrap();
    assert_eq!(dropped.series("close").unwrap().len(), 2);
}
