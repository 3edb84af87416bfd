//! Glue between the data source, the cleaning steps and the analytics crate.

use analytics::{Comparison, RiskParameters, SkippedTicker, compare};
use anyhow::{Context, Result, bail};
use cleaning::{
    Aggregation, Frame, Frequency, align_frames, remove_missing_values, remove_outliers, resample,
};
use configuration::CleaningConfig;
use core_types::PriceSeries;
use data_source::{DateRange, PriceSource};

/// The column every metric is computed from.
pub const PRICE_COLUMN: &str = "close";

pub const VOLUME_COLUMN: &str = "volume";

/// Loads one ticker as an OHLCV frame.
pub fn load_frame(source: &dyn PriceSource, ticker: &str, range: DateRange) -> Result<Frame> {
    let klines = source
        .fetch_klines(ticker, range)
        .with_context(|| format!("Failed to load {ticker} from the {} source", source.name()))?;
    Frame::from_klines(&klines).with_context(|| format!("Invalid price history for {ticker}"))
}

/// The most recent traded volume, if the last row has one.
pub fn last_volume(frame: &Frame) -> Option<f64> {
    frame.column(VOLUME_COLUMN)?.last().copied().flatten()
}

/// Runs the configured cleaning steps and extracts the close series.
///
/// Resampling happens first so that the periods it leaves empty are filled
/// like any other gap. Rows before the first known close are dropped after
/// filling, since no fill can reach back past the start of a history.
pub fn clean_prices(
    frame: &Frame,
    cleaning: &CleaningConfig,
    frequency: Option<Frequency>,
) -> Result<PriceSeries> {
    let frame = match frequency {
        Some(f) => resample(frame, f, Aggregation::Last)?,
        None => frame.clone(),
    };
    let frame = remove_missing_values(&frame, cleaning.fill_method, cleaning.missing_threshold)?;
    let frame = frame.trim_leading_missing(PRICE_COLUMN)?;
    let frame = remove_outliers(
        &frame,
        cleaning.outlier_method,
        cleaning.outlier_threshold,
        Some(&[PRICE_COLUMN]),
    )?;
    Ok(frame.series(PRICE_COLUMN)?)
}

/// Loads, aligns and cleans every ticker, then compares them.
///
/// A ticker that cannot be loaded or cleaned ends up in `skipped`, the same
/// as one the analytics could not summarize.
pub fn compare_tickers(
    source: &dyn PriceSource,
    tickers: &[&str],
    range: DateRange,
    cleaning: &CleaningConfig,
    params: &RiskParameters,
) -> Result<Comparison> {
    let mut skipped = Vec::new();
    let mut loaded = Vec::new();
    for (ticker, result) in source.fetch_many(tickers, range) {
        match result {
            Ok(klines) => {
                let frame = Frame::from_klines(&klines)
                    .with_context(|| format!("Invalid price history for {ticker}"))?;
                loaded.push((ticker, frame));
            }
            Err(e) => skipped.push(SkippedTicker {
                ticker,
                reason: e.to_string(),
            }),
        }
    }
    if loaded.is_empty() {
        bail!("None of the requested tickers could be loaded");
    }

    let frames: Vec<Frame> = loaded.iter().map(|(_, f)| f.clone()).collect();
    let aligned = align_frames(&frames, cleaning.align_method);

    let mut prices = Vec::with_capacity(aligned.len());
    for ((ticker, _), frame) in loaded.into_iter().zip(&aligned) {
        match clean_prices(frame, cleaning, None) {
            Ok(series) => prices.push((ticker, series)),
            Err(e) => {
                tracing::warn!(ticker = %ticker, error = %e, "Skipping ticker after cleaning");
                skipped.push(SkippedTicker {
                    ticker,
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    let mut comparison = compare(&prices, params)?;
    comparison.skipped.extend(skipped);
    Ok(comparison)
}
