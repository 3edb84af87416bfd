use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CleaningError {
    #[error("Column '{0}' does not exist in the frame")]
    UnknownColumn(String),

    #[error("Column '{column}' has {actual} values but the index has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column '{column}' still has {count} missing values")]
    MissingValues { column: String, count: usize },

    #[error("Invalid cleaning parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Date out of the supported calendar range near {0}")]
    DateOutOfRange(String),

    #[error("Series error: {0}")]
    Series(#[from] CoreError),
}
