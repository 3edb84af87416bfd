use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::validation::{require_confidence, require_finite, require_periods, require_window};

/// Trading days in a year; the canonical annualization factor.
pub const DEFAULT_PERIODS_PER_YEAR: u32 = 252;
/// Left-tail probability used for VaR/CVaR (the "95%" figures).
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.05;
/// Trailing window for rolling volatility.
pub const DEFAULT_ROLLING_WINDOW: usize = 30;
/// Annual risk-free rate used by the Sharpe ratio.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.0;

/// The named parameters every metric is computed with.
///
/// Deserializes from the `[analytics]` section of the configuration; any
/// omitted field falls back to the public defaults above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParameters {
    pub periods_per_year: u32,
    pub risk_free_rate: f64,
    pub confidence_level: f64,
    pub rolling_window: usize,
}

impl Default for RiskParameters {
    fn default() -> Self {
        Self {
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            rolling_window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

impl RiskParameters {
    /// Checks every parameter up front so a report never fails half-way on a
    /// bad setting.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        require_periods(self.periods_per_year)?;
        require_finite("risk_free_rate", self.risk_free_rate)?;
        require_confidence(self.confidence_level)?;
        require_window(self.rolling_window)?;
        Ok(())
    }
}
