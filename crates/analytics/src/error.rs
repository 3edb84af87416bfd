use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to calculate '{metric}': need at least {required} observations, got {actual}")]
    InsufficientData {
        metric: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Invalid input for '{metric}': {reason}")]
    InvalidInput { metric: &'static str, reason: String },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Calculation error: Division by zero encountered in metric '{0}'")]
    DivisionByZero(&'static str),

    #[error("Failed to build the output series: {0}")]
    Series(#[from] CoreError),
}
