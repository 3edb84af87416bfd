//! # Price Data Sources
//!
//! Loads daily OHLCV history for a ticker. The rest of the workspace only sees
//! the `PriceSource` trait, so the backing store can be swapped (a directory of
//! JSON files for the CLI, an in-memory map for tests) without touching the
//! analytics or cleaning code.
//!
//! Every implementation returns the same shape: klines sorted by `open_time`,
//! one per timestamp, restricted to the requested `DateRange`, and never empty.

use chrono::NaiveDate;
use core_types::Kline;

pub mod error;
pub mod json_file;
pub mod memory;

// --- Public API ---
pub use error::SourceError;
pub use json_file::JsonFileSource;
pub use memory::InMemorySource;

/// Inclusive calendar bounds for a request. A missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, SourceError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(SourceError::InvalidRange {
                    start: s.to_string(),
                    end: e.to_string(),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// The unbounded range.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

/// The generic interface for anything that can supply price history.
/// The CLI is written against this trait, allowing the underlying store to be
/// swapped out.
pub trait PriceSource: Send + Sync {
    /// A short label for logs.
    fn name(&self) -> &str;

    /// Fetches the daily klines of one ticker within `range`.
    fn fetch_klines(&self, ticker: &str, range: DateRange) -> Result<Vec<Kline>, SourceError>;

    /// Fetches several tickers. A failure is reported against its ticker and
    /// does not stop the others.
    fn fetch_many(
        &self,
        tickers: &[&str],
        range: DateRange,
    ) -> Vec<(String, Result<Vec<Kline>, SourceError>)> {
        tickers
            .iter()
            .map(|ticker| {
                let result = self.fetch_klines(ticker, range);
                if let Err(e) = &result {
                    tracing::warn!(source = self.name(), ticker, error = %e, "Failed to fetch ticker");
                }
                (ticker.to_string(), result)
            })
            .collect()
    }
}

/// Upper-cases a ticker and rejects anything that is not a plain symbol
/// (letters, digits and `. - ^ = _`, as in `BRK-B` or `^GSPC`).
pub(crate) fn normalize_ticker(ticker: &str) -> Result<String, SourceError> {
    let ticker = ticker.trim();
    let valid = !ticker.is_empty()
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=' | '_'))
        && ticker.chars().any(|c| c.is_ascii_alphanumeric());
    if !valid {
        return Err(SourceError::InvalidTicker(ticker.to_string()));
    }
    Ok(ticker.to_ascii_uppercase())
}

/// Sorts, de-duplicates (the last record for a timestamp wins) and filters to
/// `range`.
pub(crate) fn normalize_klines(
    ticker: &str,
    mut klines: Vec<Kline>,
    range: DateRange,
) -> Result<Vec<Kline>, SourceError> {
    klines.sort_by_key(|k| k.open_time);

    let mut unique: Vec<Kline> = Vec::with_capacity(klines.len());
    let mut duplicates = 0usize;
    for kline in klines {
        match unique.last_mut() {
            Some(prev) if prev.open_time == kline.open_time => {
                *prev = kline;
                duplicates += 1;
            }
            _ => unique.push(kline),
        }
    }
    if duplicates > 0 {
        tracing::warn!(ticker, duplicates, "Dropped duplicate klines, keeping the last of each");
    }

    unique.retain(|k| range.contains(k.open_time.date_naive()));
    if unique.is_empty() {
        return Err(SourceError::NoData(ticker.to_string()));
    }
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn kline(n: i64, close: i64) -> Kline {
        let c = Decimal::from(close);
        Kline { open_time: day(n), open: c, high: c, low: c, close: c, volume: Decimal::ONE }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(Some(date(2)), Some(date(4))).unwrap();
        assert!(!range.contains(date(1)));
        assert!(range.contains(date(2)));
        assert!(range.contains(date(4)));
        assert!(!range.contains(date(5)));
        assert!(DateRange::all().contains(date(31)));
    }

    #[test]
    fn test_date_range_rejects_reversed_bounds() {
        assert!(matches!(
            DateRange::new(Some(date(5)), Some(date(1))),
            Err(SourceError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_ticker("brk-b").unwrap(), "BRK-B");
        assert_eq!(normalize_ticker("^gspc").unwrap(), "^GSPC");
        for bad in ["", "   ", "../etc", "a/b", "..", "AA PL"] {
            assert!(normalize_ticker(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_normalize_klines_sorts_and_keeps_last_duplicate() {
        let klines = vec![kline(2, 12), kline(0, 10), kline(1, 11), kline(1, 99)];
        let out = normalize_klines("T", klines, DateRange::all()).unwrap();
        let closes: Vec<_> = out.iter().map(|k| k.close).collect();
        assert_eq!(closes, vec![Decimal::from(10), Decimal::from(99), Decimal::from(12)]);
    }

    #[test]
    fn test_normalize_klines_empty_after_filter_is_no_data() {
        let range = DateRange::new(Some(date(20)), None).unwrap();
        let err = normalize_klines("T", vec![kline(0, 1)], range).unwrap_err();
        assert!(matches!(err, SourceError::NoData(t) if t == "T"));
    }
}
