use core_types::Kline;
use std::collections::HashMap;

use crate::error::SourceError;
use crate::{DateRange, PriceSource, normalize_klines, normalize_ticker};

/// A `PriceSource` backed by a map, for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    data: HashMap<String, Vec<Kline>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the history of `ticker`, replacing anything already held for it.
    pub fn insert(&mut self, ticker: &str, klines: Vec<Kline>) -> Result<(), SourceError> {
        self.data.insert(normalize_ticker(ticker)?, klines);
        Ok(())
    }

    pub fn with_ticker(mut self, ticker: &str, klines: Vec<Kline>) -> Result<Self, SourceError> {
        self.insert(ticker, klines)?;
        Ok(self)
    }
}

impl PriceSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_klines(&self, ticker: &str, range: DateRange) -> Result<Vec<Kline>, SourceError> {
        let ticker = normalize_ticker(ticker)?;
        let klines = self
            .data
            .get(&ticker)
            .cloned()
            .ok_or_else(|| SourceError::NoData(ticker.clone()))?;
        normalize_klines(&ticker, klines, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn kline(day: u32) -> Kline {
        Kline {
            open_time: Utc.with_ymd_and_hms(2024, 5, day, 0, 0, 0).unwrap(),
            open: dec!(1),
            high: dec!(1),
            low: dec!(1),
            close: dec!(1),
            volume: dec!(1),
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let source = InMemorySource::new().with_ticker("spy", vec![kline(2), kline(1)]).unwrap();
        let out = source.fetch_klines("SPY", DateRange::all()).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out[0].open_time < out[1].open_time);
    }

    #[test]
    fn test_unknown_ticker_is_no_data() {
        let err = InMemorySource::new().fetch_klines("QQQ", DateRange::all()).unwrap_err();
        assert!(matches!(err, SourceError::NoData(_)));
    }

    #[test]
    fn test_empty_history_is_no_data() {
        let source = InMemorySource::new().with_ticker("IWM", Vec::new()).unwrap();
        assert!(source.fetch_klines("iwm", DateRange::all()).is_err());
    }
}
