use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single OHLCV bar as supplied by the fetch layer.
///
/// Prices and volume are kept as `Decimal` so that the quoted values survive
/// deserialization unchanged; analytics convert the `close` to `f64` once, when
/// a `TimeSeries` is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}
