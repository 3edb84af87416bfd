use core_types::Kline;
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::{DateRange, PriceSource, normalize_klines, normalize_ticker};

/// Reads `<directory>/<TICKER>.json`, each holding a JSON array of klines.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    directory: PathBuf,
}

impl JsonFileSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.directory.join(format!("{ticker}.json"))
    }
}

impl PriceSource for JsonFileSource {
    fn name(&self) -> &str {
        "json"
    }

    fn fetch_klines(&self, ticker: &str, range: DateRange) -> Result<Vec<Kline>, SourceError> {
        let ticker = normalize_ticker(ticker)?;
        let path = self.path_for(&ticker);

        let contents = std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => SourceError::NoData(ticker.clone()),
            _ => SourceError::Io {
                path: path.clone(),
                source,
            },
        })?;

        let klines: Vec<Kline> = serde_json::from_str(&contents)
            .map_err(|source| SourceError::Deserialization {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(ticker = %ticker, path = %path.display(), records = klines.len(), "Loaded price history");
        normalize_klines(&ticker, klines, range)
    }
}
