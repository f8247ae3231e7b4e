// Sources of daily price series
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use shared::models::{PriceBar, PriceSeries};

use super::csv_parser::{load_bars_from_csv, CsvDialect};
use crate::error::EngineError;

/// Supplies the historical series for a symbol. An unknown symbol yields an
/// empty series rather than an error, leaving the decision to the caller.
pub trait PriceSource: Send + Sync {
    fn fetch(&self, symbol: &str) -> Result<PriceSeries, EngineError>;
}

/// Symbols double as file names, so only a conservative character set is allowed.
pub fn validate_symbol(symbol: &str) -> Result<(), EngineError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '^' | '=' | '-');
    if symbol.is_empty()
        || symbol.len() > 32
        || symbol.starts_with('.')
        || !symbol.chars().all(allowed)
    {
        return Err(EngineError::InvalidSymbol(symbol.to_string()));
    }
    Ok(())
}

fn into_series(symbol: &str, mut bars: Vec<PriceBar>) -> Result<PriceSeries, EngineError> {
    // Some exports list the newest bar first.
    bars.sort_by_key(|b| b.timestamp);
    Ok(PriceSeries::new(symbol, bars)?)
}

/// Looks up `<dir>/<SYMBOL>.csv`, trying the symbol as given and then upper-cased.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    dir: PathBuf,
    dialect: CsvDialect,
}

impl CsvDirectorySource {
    pub fn new(dir: impl Into<PathBuf>, dialect: CsvDialect) -> Self {
        Self {
            dir: dir.into(),
            dialect,
        }
    }

    fn candidates(&self, symbol: &str) -> Vec<PathBuf> {
        let mut paths = vec![self.dir.join(format!("{}.csv", symbol))];
        let upper = symbol.to_ascii_uppercase();
        if upper != symbol {
            paths.push(self.dir.join(format!("{}.csv", upper)));
        }
        paths
    }
}

impl PriceSource for CsvDirectorySource {
    fn fetch(&self, symbol: &str) -> Result<PriceSeries, EngineError> {
        validate_symbol(symbol)?;
        for path in self.candidates(symbol) {
            match load_bars_from_csv(&path, self.dialect) {
                Ok(bars) => {
                    tracing::info!(
                        symbol,
                        path = %path.display(),
                        count = bars.len(),
                        "Loaded price data"
                    );
                    return into_series(symbol, bars);
                }
                Err(EngineError::IoError { source }) if source.kind() == ErrorKind::NotFound => {
                    continue
                }
                Err(e) => return Err(e),
            }
        }
        tracing::warn!(symbol, dir = %self.dir.display(), "No price file found for symbol");
        Ok(PriceSeries::empty(symbol))
    }
}

/// Serves a single CSV file whatever symbol is requested.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
    dialect: CsvDialect,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>, dialect: CsvDialect) -> Self {
        Self {
            path: path.into(),
            dialect,
        }
    }
}

impl PriceSource for CsvFileSource {
    fn fetch(&self, symbol: &str) -> Result<PriceSeries, EngineError> {
        let bars = load_bars_from_csv(&self.path, self.dialect)?;
        tracing::info!(
            symbol,
            path = %self.path.display(),
            count = bars.len(),
            "Loaded price data"
        );
        into_series(symbol, bars)
    }
}

/// In-memory bars keyed by symbol.
#[derive(Debug, Default)]
pub struct MarketDataStore {
    data: HashMap<String, Vec<PriceBar>>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `new_bars` into the symbol's history. When two bars share a
    /// timestamp the one already stored wins.
    pub fn add_bars(&mut self, symbol: &str, new_bars: Vec<PriceBar>) {
        let bars = self.data.entry(symbol.to_string()).or_default();
        bars.extend(new_bars);
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
    }
}

impl PriceSource for MarketDataStore {
    fn fetch(&self, symbol: &str) -> Result<PriceSeries, EngineError> {
        match self.data.get(symbol) {
            Some(bars) => Ok(PriceSeries::new(symbol, bars.clone())?),
            None => Ok(PriceSeries::empty(symbol)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::fs;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            timestamp: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 10.0,
        }
    }

    #[test]
    fn test_validate_symbol() {
        for ok in ["AAPL", "PETR4.SA", "^BVSP", "BRL=X", "BTC-USD"] {
            assert!(validate_symbol(ok).is_ok(), "{}", ok);
        }
        for bad in ["", "../etc/passwd", "A/B", "..", "AA PL"] {
            assert!(matches!(validate_symbol(bad), Err(EngineError::InvalidSymbol(_))), "{}", bad);
        }
    }

    #[test]
    fn test_store_merges_sorts_and_dedups() {
        let mut store = MarketDataStore::new();
        store.add_bars("TEST", vec![bar(3, 3.0), bar(1, 1.0)]);
        store.add_bars("TEST", vec![bar(2, 2.0), bar(3, 99.0)]);
        let series = store.fetch("TEST").unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_store_unknown_symbol_is_empty() {
        let store = MarketDataStore::new();
        assert!(store.fetch("NOPE").unwrap().is_empty());
    }

    #[test]
    fn test_directory_source_reads_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("VALE3.csv"),
            "Date,Open,High,Low,Close,Volume\n2024-01-03,1,1,1,11,100\n2024-01-02,1,1,1,10,100\n",
        )
        .unwrap();
        let source = CsvDirectorySource::new(dir.path(), CsvDialect::Standard);
        let series = source.fetch("vale3").unwrap();
        assert_eq!(series.symbol(), "vale3");
        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }

    #[test]
    fn test_directory_source_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDirectorySource::new(dir.path(), CsvDialect::Standard);
        assert!(source.fetch("MISSING").unwrap().is_empty());
    }

    #[test]
    fn test_directory_source_rejects_duplicate_dates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("DUP.csv"),
            "Date,Close,Volume\n2024-01-02,10,100\n2024-01-02,11,100\n",
        )
        .unwrap();
        let source = CsvDirectorySource::new(dir.path(), CsvDialect::Standard);
        assert!(matches!(source.fetch("DUP"), Err(EngineError::InvalidSeries { .. })));
    }

    #[test]
    fn test_file_source_missing_file_is_io_error() {
        let source = CsvFileSource::new("no/such/file.csv", CsvDialect::Standard);
        assert!(matches!(source.fetch("X"), Err(EngineError::IoError { .. })));
    }
}
