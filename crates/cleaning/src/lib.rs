//! # Data Cleaning
//!
//! Prepares raw OHLCV data for the analytics crate: fills or drops missing
//! values, filters outliers, puts several tickers on a common index and
//! downsamples to calendar periods.
//!
//! ## Architectural Principles
//!
//! - **Frames In, Frames Out:** Every operation takes a `Frame` by reference and
//!   returns a new one. Inputs are never modified.
//! - **Explicit Gaps:** A missing observation is `None`, never `NaN`. Only a
//!   complete column can be turned back into a `TimeSeries`.
//!
//! ## Public API
//!
//! - `Frame`: a date-indexed table of named `Option<f64>` columns.
//! - `remove_missing_values`, `remove_outliers`, `align_frames`, `resample`.
//! - The method enums, all deserializable from configuration.
//! - `CleaningError`.

pub mod align;
pub mod error;
pub mod frame;
pub mod missing;
pub mod outliers;
pub mod resample;

// Re-export the key components to create a clean, public-facing API.
pub use align::{AlignMethod, align_frames};
pub use error::CleaningError;
pub use frame::{Column, Frame};
pub use missing::{FillMethod, remove_missing_values};
pub use outliers::{DEFAULT_OUTLIER_THRESHOLD, OutlierMethod, remove_outliers};
pub use resample::{Aggregation, Frequency, resample};
