use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use shared::models::PriceBar;

use crate::error::EngineError;

/// Layout of a daily-bar CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CsvDialect {
    /// `Date,Open,High,Low,Close,Volume`, as written by most market-data downloaders.
    #[default]
    Standard,
    /// `Ativo;Data;Hora;Abertura;Máximo;Mínimo;Fechamento;Volume;Quantidade`
    /// with `1.234,56` decimals and `dd/mm/yyyy` dates.
    Brazilian,
}

impl CsvDialect {
    fn delimiter(self) -> u8 {
        match self {
            CsvDialect::Standard => b',',
            CsvDialect::Brazilian => b';',
        }
    }

    fn columns(self) -> Columns {
        match self {
            CsvDialect::Standard => Columns {
                date: "Date",
                time: None,
                open: "Open",
                high: "High",
                low: "Low",
                close: "Close",
                volume: "Volume",
            },
            CsvDialect::Brazilian => Columns {
                date: "Data",
                time: Some("Hora"),
                open: "Abertura",
                high: "Máximo",
                low: "Mínimo",
                close: "Fechamento",
                volume: "Volume",
            },
        }
    }
}

struct Columns {
    date: &'static str,
    time: Option<&'static str>,
    open: &'static str,
    high: &'static str,
    low: &'static str,
    close: &'static str,
    volume: &'static str,
}

// Number and date handling for the Brazilian export format
pub mod brazilian_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

    // "1.234,56" -> 1234.56
    pub fn parse_decimal(s: &str) -> Result<f64> {
        let normalized = s.trim().replace('.', "").replace(',', ".");
        normalized.parse::<f64>().map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
    }

    // "dd/mm/yyyy" plus an optional "HH:MM:SS"
    pub fn parse_datetime(date_str: &str, time_str: Option<&str>) -> Result<DateTime<Utc>> {
        let date = NaiveDate::parse_from_str(date_str.trim(), "%d/%m/%Y")
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", date_str, e))?;
        let time = match time_str.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => NaiveTime::parse_from_str(t, "%H:%M:%S")
                .map_err(|e| anyhow!("Failed to parse time '{}': {}", t, e))?,
            None => NaiveTime::MIN,
        };
        Ok(DateTime::from_naive_utc_and_offset(date.and_time(time), Utc))
    }

}

// Number and date handling for the comma-delimited export format
pub mod standard_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    pub fn parse_decimal(s: &str) -> Result<f64> {
        s.trim().parse::<f64>().map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
    }

    // "2024-01-02", "2024-01-02 00:00:00-05:00", "2024-01-02T00:00:00Z" or "2024-01-02 00:00:00"
    pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            let midnight = date.and_time(chrono::NaiveTime::MIN);
            return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))
    }

}

/// Reads daily bars from a CSV file. Rows are returned in file order.
pub fn load_bars_from_csv(path: &Path, dialect: CsvDialect) -> Result<Vec<PriceBar>, EngineError> {
    let file = File::open(path)?;
    let bars = parse_bars(BufReader::new(file), dialect)?;
    tracing::debug!(path = %path.display(), ?dialect, count = bars.len(), "Parsed CSV price data");
    Ok(bars)
}

pub fn parse_bars<R: Read>(reader: R, dialect: CsvDialect) -> Result<Vec<PriceBar>, EngineError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(dialect.delimiter())
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = dialect.columns();
    let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let require = |name: &'static str| {
        find(name).ok_or_else(|| {
            EngineError::CsvDataFormatError(format!("Missing '{}' column in CSV header", name))
        })
    };

    let date_idx = require(columns.date)?;
    let close_idx = require(columns.close)?;
    let volume_idx = require(columns.volume)?;
    let time_idx = columns.time.and_then(find);
    let open_idx = find(columns.open);
    let high_idx = find(columns.high);
    let low_idx = find(columns.low);

    let mut bars = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let record = result?;

        let date_str = field(&record, date_idx, columns.date, line)?;
        let time_str = time_idx.and_then(|i| record.get(i));
        let timestamp = match dialect {
            CsvDialect::Standard => standard_format::parse_datetime(date_str),
            CsvDialect::Brazilian => brazilian_format::parse_datetime(date_str, time_str),
        }
        .map_err(|e| parse_error(columns.date, line, e))?;

        let number = |index: usize, name: &str| -> Result<f64, EngineError> {
            let raw = field(&record, index, name, line)?;
            match dialect {
                CsvDialect::Standard => standard_format::parse_decimal(raw),
                CsvDialect::Brazilian => brazilian_format::parse_decimal(raw),
            }
            .map_err(|e| parse_error(name, line, e))
        };

        let close = number(close_idx, columns.close)?;
        let volume = number(volume_idx, columns.volume)?;
        let open = open_idx.map(|i| number(i, columns.open)).transpose()?.unwrap_or(close);
        let high = high_idx.map(|i| number(i, columns.high)).transpose()?.unwrap_or(close);
        let low = low_idx.map(|i| number(i, columns.low)).transpose()?.unwrap_or(close);

        bars.push(PriceBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }
    Ok(bars)
}

fn field<'a>(
    record: &'a StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<&'a str, EngineError> {
    record.get(index).filter(|v| !v.is_empty()).ok_or_else(|| {
        EngineError::CsvDataFormatError(format!(
            "Missing '{}' field in CSV record at line {}",
            name, line
        ))
    })
}

fn parse_error(name: &str, line: usize, err: anyhow::Error) -> EngineError {
    EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: {}", name, line, err))
}
