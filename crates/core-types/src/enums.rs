use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// How period-over-period returns are derived from a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// `(p[i] - p[i-1]) / p[i-1]`
    #[default]
    Simple,
    /// `ln(p[i] / p[i-1])`
    Log,
}

impl fmt::Display for ReturnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnKind::Simple => write!(f, "simple"),
            ReturnKind::Log => write!(f, "log"),
        }
    }
}

impl FromStr for ReturnKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" | "pct" => Ok(ReturnKind::Simple),
            "log" => Ok(ReturnKind::Log),
            other => Err(CoreError::InvalidInput(
                "return kind".to_string(),
                format!("expected 'simple' or 'log', got '{other}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_return_kind() {
        assert_eq!("simple".parse::<ReturnKind>().unwrap(), ReturnKind::Simple);
        assert_eq!("LOG".parse::<ReturnKind>().unwrap(), ReturnKind::Log);
        assert!("geometric".parse::<ReturnKind>().is_err());
    }
}
