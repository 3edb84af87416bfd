//! # Return & Risk Analytics
//!
//! Pure, stateless numeric transforms over an ordered price or return series:
//! returns, annualization, volatility, Sharpe ratio, drawdown, VaR and CVaR.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of data sources, files or the
//!   presentation layer. It depends only on `core-types`.
//! - **Free Functions:** Every operation is a function of its input series and
//!   explicit parameters. Nothing is cached and no call affects another, so the
//!   functions are safe to call from any thread.
//! - **Eager Validation:** Preconditions are checked before any work is done and
//!   a failure never yields a partial result.
//!
//! ## Public API
//!
//! - `returns`: simple/log/cumulative/annualized returns.
//! - `risk`: volatility (point and rolling), Sharpe, drawdown, VaR, CVaR.
//! - `RiskReport`, `RiskProfile`, `PerformanceSummary`, `compare`: metric bundles.
//! - `summary`: latest close, daily change and the return histogram.
//! - `RiskParameters` and the `DEFAULT_*` constants.
//! - `AnalyticsError`: the error kinds every operation can return.

pub mod error;
pub mod params;
pub mod report;
pub mod returns;
pub mod risk;
pub mod stats;
pub mod summary;
mod validation;

// Re-export the key components to create a clean, public-facing API.
pub use error::AnalyticsError;
pub use params::{
    DEFAULT_CONFIDENCE_LEVEL, DEFAULT_PERIODS_PER_YEAR, DEFAULT_RISK_FREE_RATE,
    DEFAULT_ROLLING_WINDOW, RiskParameters,
};
pub use report::{
    Comparison, PerformanceSummary, RiskProfile, RiskReport, SkippedTicker, TickerPerformance,
    compare,
};
pub use returns::{
    annualized_return, cumulative_returns, log_returns, returns, simple_returns, total_return,
};
pub use risk::{
    RollingVolatility, cvar, drawdown_series, max_drawdown, realized_volatility,
    rolling_volatility, sharpe_ratio, var,
};
pub use summary::{DEFAULT_HISTOGRAM_BINS, HistogramBin, PriceSummary, return_histogram};
