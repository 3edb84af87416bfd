use chrono::{DateTime, Utc};
use core_types::{CoreError, Kline, Observation, TimeSeries};
use rust_decimal::prelude::ToPrimitive;

use crate::error::CleaningError;

/// A named column of optional values; `None` marks a missing observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// A small date-indexed table: one ascending timestamp index shared by any
/// number of named columns, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    index: Vec<DateTime<Utc>>,
    columns: Vec<Column>,
}

impl Frame {
    /// Creates a frame with no columns. The index must be strictly increasing.
    pub fn new(index: Vec<DateTime<Utc>>) -> Result<Self, CleaningError> {
        if let Some(pos) = index.windows(2).position(|w| w[1] <= w[0]) {
            return Err(CoreError::UnorderedTimestamps { index: pos + 1 }.into());
        }
        Ok(Self {
            index,
            columns: Vec::new(),
        })
    }

    /// Adds a column, replacing any existing column of the same name.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, CleaningError> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(CleaningError::LengthMismatch {
                column: name,
                expected: self.index.len(),
                actual: values.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column { name, values }),
        }
        Ok(self)
    }

    /// Builds `open/high/low/close/volume` columns from ascending klines.
    /// A decimal that has no `f64` representation becomes a missing value.
    pub fn from_klines(klines: &[Kline]) -> Result<Self, CleaningError> {
        let index = klines.iter().map(|k| k.open_time).collect();
        let field = |f: fn(&Kline) -> rust_decimal::Decimal| -> Vec<Option<f64>> {
            klines.iter().map(|k| f(k).to_f64()).collect()
        };

        Self::new(index)?
            .with_column("open", field(|k| k.open))?
            .with_column("high", field(|k| k.high))?
            .with_column("low", field(|k| k.low))?
            .with_column("close", field(|k| k.close))?
            .with_column("volume", field(|k| k.volume))
    }

    /// Wraps a complete series as a single-column frame.
    pub fn from_series(name: impl Into<String>, series: &TimeSeries) -> Self {
        Self {
            index: series.timestamps(),
            columns: vec![Column {
                name: name.into(),
                values: series.iter().map(|o| Some(o.value)).collect(),
            }],
        }
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Extracts a column as a `TimeSeries`. Every value must be present.
    pub fn series(&self, name: &str) -> Result<TimeSeries, CleaningError> {
        let values = self
            .column(name)
            .ok_or_else(|| CleaningError::UnknownColumn(name.to_string()))?;

        let missing = values.iter().filter(|v| v.is_none()).count();
        if missing > 0 {
            return Err(CleaningError::MissingValues {
                column: name.to_string(),
                count: missing,
            });
        }

        let points = self
            .index
            .iter()
            .zip(values)
            .filter_map(|(ts, v)| v.map(|value| Observation::new(*ts, value)))
            .collect();
        Ok(TimeSeries::new(points)?)
    }

    /// Drops the rows before the first present value of `column`.
    ///
    /// A history that starts later than the frame's index (after an outer
    /// alignment, say) is then measured over the span it actually covers.
    pub fn trim_leading_missing(&self, column: &str) -> Result<Frame, CleaningError> {
        let values = self
            .column(column)
            .ok_or_else(|| CleaningError::UnknownColumn(column.to_string()))?;
        let start = values.iter().position(Option::is_some).unwrap_or(values.len());
        let keep: Vec<bool> = (0..self.len()).map(|row| row >= start).collect();
        Ok(self.select_rows(&keep))
    }

    pub(crate) fn from_parts(index: Vec<DateTime<Utc>>, columns: Vec<Column>) -> Self {
        Self { index, columns }
    }

    pub(crate) fn retain_columns<F>(&self, mut keep: F) -> Frame
    where
        F: FnMut(&Column) -> bool,
    {
        Frame {
            index: self.index.clone(),
            columns: self.columns.iter().filter(|c| keep(c)).cloned().collect(),
        }
    }

    /// Keeps only the rows whose flag is `true`.
    pub(crate) fn select_rows(&self, keep: &[bool]) -> Frame {
        let pick = |values: &[Option<f64>]| -> Vec<Option<f64>> {
            values
                .iter()
                .zip(keep)
                .filter(|(_, k)| **k)
                .map(|(v, _)| *v)
                .collect()
        };

        Frame {
            index: self
                .index
                .iter()
                .zip(keep)
                .filter(|(_, k)| **k)
                .map(|(ts, _)| *ts)
                .collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: pick(&c.values),
                })
                .collect(),
        }
    }

    /// Conforms the frame to `index`; positions absent from this frame become `None`.
    pub(crate) fn reindex(&self, index: &[DateTime<Utc>]) -> Frame {
        let positions: Vec<Option<usize>> = index
            .iter()
            .map(|ts| self.index.binary_search(ts).ok())
            .collect();

        Frame {
            index: index.to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: positions.iter().map(|p| p.and_then(|i| c.values[i])).collect(),
                })
                .collect(),
        }
    }
}
