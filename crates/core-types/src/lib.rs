//! # Core Types
//!
//! The shared vocabulary of the workspace: the OHLCV `Kline` handed over by the
//! fetch layer, and the validated `TimeSeries` that every calculation consumes.
//!
//! This crate has no knowledge of analytics, cleaning or configuration. Every
//! other crate depends on it.

pub mod enums;
pub mod error;
pub mod series;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::ReturnKind;
pub use error::CoreError;
pub use series::{Observation, PriceSeries, ReturnSeries, SparseSeries, TimeSeries};
pub use structs::Kline;
