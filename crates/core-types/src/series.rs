use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::structs::Kline;

/// One timestamped value. Serializes as `{"timestamp": ..., "value": ...}`,
/// which is the shape the chart layer plots directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation<T = f64> {
    pub timestamp: DateTime<Utc>,
    pub value: T,
}

impl<T> Observation<T> {
    pub fn new(timestamp: DateTime<Utc>, value: T) -> Self {
        Self { timestamp, value }
    }
}

/// A series in which some positions carry no value (e.g. the warm-up of a
/// rolling window).
pub type SparseSeries = Vec<Observation<Option<f64>>>;

/// An ordered, validated sequence of `(timestamp, value)` observations.
///
/// Construction guarantees that timestamps are strictly increasing and that
/// every value is finite. Once built, a series is never mutated; every
/// transform returns a new one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct TimeSeries {
    points: Vec<Observation>,
}

/// A series of prices (`value > 0` is a caller precondition).
pub type PriceSeries = TimeSeries;

/// A series of per-period returns, one shorter than the prices it came from.
pub type ReturnSeries = TimeSeries;

impl TimeSeries {
    pub fn new(points: Vec<Observation>) -> Result<Self, CoreError> {
        for (index, point) in points.iter().enumerate() {
            if !point.value.is_finite() {
                return Err(CoreError::NonFiniteValue {
                    index,
                    value: point.value,
                });
            }
            if index > 0 && point.timestamp <= points[index - 1].timestamp {
                return Err(CoreError::UnorderedTimestamps { index });
            }
        }
        Ok(Self { points })
    }

    /// Builds a series from parallel timestamp/value iterators.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(timestamp, value)| Observation::new(timestamp, value))
                .collect(),
        )
    }

    /// Builds a price series from the `close` field of each kline.
    ///
    /// The klines must already be in ascending `open_time` order.
    pub fn from_klines(klines: &[Kline]) -> Result<Self, CoreError> {
        let points = klines
            .iter()
            .map(|k| {
                let close = k.close.to_f64().ok_or_else(|| CoreError::Conversion {
                    field: "close",
                    timestamp: k.open_time.to_rfc3339(),
                })?;
                Ok(Observation::new(k.open_time, close))
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.points.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }
}

impl TryFrom<Vec<Observation>> for TimeSeries {
    type Error = CoreError;

    fn try_from(points: Vec<Observation>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<TimeSeries> for Vec<Observation> {
    fn from(series: TimeSeries) -> Self {
        series.points
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
