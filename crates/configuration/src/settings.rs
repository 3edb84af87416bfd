use analytics::RiskParameters;
use cleaning::{AlignMethod, DEFAULT_OUTLIER_THRESHOLD, FillMethod, OutlierMethod};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
///
/// Every section is optional; an empty file (or no file at all) yields the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analytics: RiskParameters,
    pub data: DataConfig,
    pub cleaning: CleaningConfig,
    pub logging: LoggingConfig,
}

/// Where price history is read from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding one `<TICKER>.json` file per ticker.
    pub directory: PathBuf,
    pub source: SourceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Json,
}

/// How raw data is prepared before any metric is computed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub fill_method: FillMethod,
    /// Columns missing more than this fraction of values are dropped.
    pub missing_threshold: Option<f64>,
    pub outlier_method: OutlierMethod,
    pub outlier_threshold: f64,
    /// How several tickers are put on a common index before comparison.
    pub align_method: AlignMethod,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive (e.g. `info` or `analytics=debug`).
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
}

// --- Default Implementations ---

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
            source: SourceKind::default(),
        }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            fill_method: FillMethod::default(),
            missing_threshold: None,
            outlier_method: OutlierMethod::default(),
            outlier_threshold: DEFAULT_OUTLIER_THRESHOLD,
            align_method: AlignMethod::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Rejects values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |section: &'static str, reason: String| ConfigError::ValidationError { section, reason };

        self.analytics
            .validate()
            .map_err(|e| invalid("analytics", e.to_string()))?;

        if self.data.directory.as_os_str().is_empty() {
            return Err(invalid("data", "directory must not be empty".to_string()));
        }

        if let Some(t) = self.cleaning.missing_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(invalid(
                    "cleaning",
                    format!("missing_threshold must be within [0, 1], got {t}"),
                ));
            }
        }
        let t = self.cleaning.outlier_threshold;
        if !(t.is_finite() && t > 0.0) {
            return Err(invalid(
                "cleaning",
                format!("outlier_threshold must be a positive number, got {t}"),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(invalid("logging", "level must not be empty".to_string()));
        }
        Ok(())
    }
}
