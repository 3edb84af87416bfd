use analytics::RiskParameters;
use clap::Args;

/// Command-line overrides for the `[analytics]` section. Anything left unset
/// keeps the configured value.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyticsOverrides {
    /// Annual risk-free rate used by the Sharpe ratio (e.g. 0.02 for 2%).
    #[arg(long)]
    pub risk_free_rate: Option<f64>,

    /// Trailing window, in periods, for rolling volatility.
    #[arg(long)]
    pub window: Option<usize>,

    /// Left-tail probability for VaR/CVaR (e.g. 0.05).
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Annualization factor (252 for daily data).
    #[arg(long)]
    pub periods_per_year: Option<u32>,
}

impl AnalyticsOverrides {
    pub fn apply(&self, params: &RiskParameters) -> RiskParameters {
        RiskParameters {
            risk_free_rate: self.risk_free_rate.unwrap_or(params.risk_free_rate),
            rolling_window: self.window.unwrap_or(params.rolling_window),
            confidence_level: self.confidence.unwrap_or(params.confidence_level),
            periods_per_year: self.periods_per_year.unwrap_or(params.periods_per_year),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_set_fields_override() {
        let overrides = AnalyticsOverrides { window: Some(10), ..Default::default() };
        let base = RiskParameters { risk_free_rate: 0.04, ..Default::default() };
        let applied = overrides.apply(&base);
        assert_eq!(applied.rolling_window, 10);
        assert_eq!(applied.risk_free_rate, 0.04);
        assert_eq!(applied.confidence_level, base.confidence_level);
    }
}
