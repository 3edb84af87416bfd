//! Eager precondition checks shared by every operation.

use crate::error::AnalyticsError;

pub(crate) fn require_len(
    metric: &'static str,
    actual: usize,
    required: usize,
) -> Result<(), AnalyticsError> {
    if actual < required {
        return Err(AnalyticsError::InsufficientData {
            metric,
            required,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn require_periods(periods_per_year: u32) -> Result<(), AnalyticsError> {
    if periods_per_year == 0 {
        return Err(AnalyticsError::InvalidParameter {
            name: "periods_per_year",
            reason: "must be a positive integer".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn require_confidence(confidence_level: f64) -> Result<(), AnalyticsError> {
    // Written so that NaN fails as well.
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(AnalyticsError::InvalidParameter {
            name: "confidence_level",
            reason: format!("must lie strictly between 0 and 1, got {confidence_level}"),
        });
    }
    Ok(())
}

pub(crate) fn require_window(window: usize) -> Result<(), AnalyticsError> {
    if window == 0 {
        return Err(AnalyticsError::InvalidParameter {
            name: "window",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<(), AnalyticsError> {
    if !value.is_finite() {
        return Err(AnalyticsError::InvalidParameter {
            name,
            reason: format!("must be a finite number, got {value}"),
        });
    }
    Ok(())
}
