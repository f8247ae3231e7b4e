use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily observation. Only `close` and `volume` feed the indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar {index} at {timestamp} is earlier than the bar before it")]
    OutOfOrder {
        index: usize,
        timestamp: DateTime<Utc>,
    },

    #[error("bar {index} repeats timestamp {timestamp}")]
    DuplicateTimestamp {
        index: usize,
        timestamp: DateTime<Utc>,
    },

    #[error("bar {index} has invalid {field} value {value}")]
    InvalidValue {
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// Chronologically ordered daily bars for one instrument.
///
/// Construction validates ordering and values, so every `PriceSeries` in
/// circulation has strictly increasing timestamps and finite, non-negative
/// close and volume columns. An empty series is representable; it is the
/// engine that refuses to work on one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() || bar.close < 0.0 {
                return Err(SeriesError::InvalidValue {
                    index,
                    field: "close",
                    value: bar.close,
                });
            }
            if !bar.volume.is_finite() || bar.volume < 0.0 {
                return Err(SeriesError::InvalidValue {
                    index,
                    field: "volume",
                    value: bar.volume,
                });
            }
            if index > 0 {
                let previous = bars[index - 1].timestamp;
                if bar.timestamp == previous {
                    return Err(SeriesError::DuplicateTimestamp {
                        index,
                        timestamp: bar.timestamp,
                    });
                }
                if bar.timestamp < previous {
                    return Err(SeriesError::OutOfOrder {
                        index,
                        timestamp: bar.timestamp,
                    });
                }
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn dates(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    /// Bars no older than `span` before the last bar. Ordering is preserved,
    /// so the result needs no re-validation.
    pub fn trailing(&self, span: Duration) -> PriceSeries {
        let Some(last) = self.bars.last() else {
            return self.clone();
        };
        let cutoff = last.timestamp - span;
        let start = self.bars.partition_point(|b| b.timestamp < cutoff);
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[start..].to_vec(),
        }
    }
}

/// Population (divide by N) or sample (divide by N-1) standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StdDevConvention {
    Population,
    #[default]
    Sample,
}

/// Output of a single transform, index-aligned with the input series.
/// `None` marks positions inside the warm-up window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub name: String,
    pub parameters: serde_json::Value,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn new(
        name: impl Into<String>,
        parameters: serde_json::Value,
        values: Vec<Option<f64>>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn first_defined_index(&self) -> Option<usize> {
        self.values.iter().position(|v| v.is_some())
    }

    pub fn is_all_undefined(&self) -> bool {
        self.values.iter().all(|v| v.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub middle: IndicatorSeries,
    pub upper: IndicatorSeries,
    pub lower: IndicatorSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    pub sma: IndicatorSeries,
    pub ema: IndicatorSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub latest_close: f64,
    pub previous_close: Option<f64>,
    pub percent_change: Option<f64>,
    pub avg_volume: f64,
}

/// Everything the engine derives from one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorBundle {
    pub symbol: String,
    pub dates: Vec<DateTime<Utc>>,
    pub close: Vec<f64>,
    pub bollinger: BollingerBands,
    pub volume: IndicatorSeries,
    pub moving_averages: MovingAverages,
    pub rsi: IndicatorSeries,
    pub summary: SummaryStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Bollinger,
    Volume,
    SmaEma,
    Rsi,
}

impl IndicatorKind {
    /// Fixed explanatory text shown next to each chart.
    pub fn caption(self) -> &'static str {
        match self {
            IndicatorKind::Bollinger => {
                "Bollinger Bands help visualize the VOLATILITY of the stock and identify POSSIBLE price reversals."
            }
            IndicatorKind::Volume => "Volume shows the TOTAL number of shares traded in a period.",
            IndicatorKind::SmaEma => {
                "SMA (Simple Moving Average) and EMA (Exponential Moving Average) help to understand the trend."
            }
            IndicatorKind::Rsi => {
                "RSI (Relative Strength Index) indicates overbought or oversold conditions."
            }
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            IndicatorKind::Bollinger => "Bollinger Bands",
            IndicatorKind::Volume => "Volume",
            IndicatorKind::SmaEma => "SMA and EMA",
            IndicatorKind::Rsi => "RSI",
        }
    }

    pub fn x_axis_title(self) -> &'static str {
        "Date"
    }

    pub fn y_axis_title(self) -> &'static str {
        match self {
            IndicatorKind::Bollinger | IndicatorKind::SmaEma => "Price",
            IndicatorKind::Volume => "Volume",
            IndicatorKind::Rsi => "RSI Value",
        }
    }
}
