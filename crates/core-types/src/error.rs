use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Timestamps must be strictly increasing: entry {index} is not after the previous entry")]
    UnorderedTimestamps { index: usize },

    #[error("Series value at entry {index} is not finite: {value}")]
    NonFiniteValue { index: usize, value: f64 },

    #[error("Failed to convert {field} of the record at {timestamp} to a float")]
    Conversion { field: &'static str, timestamp: String },
}
