// Handles one analysis request: ticker in, chart panels and summary out
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared::models::SummaryStats;

use super::panels::{bollinger_panel, rsi_panel, sma_ema_panel, volume_panel, ChartPanel};
use crate::compute::IndicatorEngine;
use crate::config::settings::EngineSettings;
use crate::data::market_data::PriceSource;
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub ticker: String,
    pub dates: Vec<DateTime<Utc>>,
    pub bollinger: ChartPanel,
    pub volume: ChartPanel,
    pub sma_ema: ChartPanel,
    pub rsi: ChartPanel,
    pub summary: SummaryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub ticker: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn from_error(ticker: &str, err: &EngineError) -> Self {
        ErrorResponse {
            ticker: ticker.to_string(),
            error: err.user_message(),
        }
    }
}

pub struct AnalysisService {
    source: Box<dyn PriceSource>,
    engine: IndicatorEngine,
    history: Option<Duration>,
    rsi_levels: (f64, f64),
}

impl AnalysisService {
    pub fn new(
        source: Box<dyn PriceSource>,
        settings: &EngineSettings,
    ) -> Result<Self, EngineError> {
        settings.validate()?;
        let history = match settings.data.history_days {
            Some(days) => Some(Duration::try_days(days).ok_or_else(|| {
                EngineError::ConfigError(format!("history_days {} is out of range", days))
            })?),
            None => None,
        };
        let indicators = &settings.indicators;
        Ok(AnalysisService {
            source,
            engine: IndicatorEngine::new(indicators.clone())?,
            history,
            rsi_levels: (indicators.rsi_overbought, indicators.rsi_oversold),
        })
    }

    pub fn analyze(&self, ticker: &str) -> Result<AnalysisResponse, EngineError> {
        tracing::info!(ticker, "Received analysis request");

        let mut series = self.source.fetch(ticker)?;
        if let Some(span) = self.history {
            series = series.trailing(span);
        }
        if series.is_empty() {
            tracing::warn!(ticker, "No price data found");
            return Err(EngineError::EmptySeries {
                symbol: ticker.to_string(),
            });
        }

        let bundle = self.engine.compute(&series)?;
        let (overbought, oversold) = self.rsi_levels;
        tracing::info!(
            ticker,
            bars = series.len(),
            latest_close = bundle.summary.latest_close,
            percent_change = ?bundle.summary.percent_change,
            "Computed indicators"
        );

        Ok(AnalysisResponse {
            ticker: ticker.to_string(),
            bollinger: bollinger_panel(&bundle),
            volume: volume_panel(&bundle),
            sma_ema: sma_ema_panel(&bundle),
            rsi: rsi_panel(&bundle, overbought, oversold),
            dates: bundle.dates,
            summary: bundle.summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::market_data::MarketDataStore;
    use crate::test_support::bars_from_closes;

    fn service_with(symbol: &str, closes: &[f64], settings: &EngineSettings) -> AnalysisService {
        let mut store = MarketDataStore::new();
        store.add_bars(symbol, bars_from_closes(closes));
        AnalysisService::new(Box::new(store), settings).unwrap()
    }

    #[test]
    fn test_analyze_echoes_ticker_and_summary() {
        let closes: Vec<f64> = (1u32..=30).map(f64::from).collect();
        let service = service_with("ITUB4", &closes, &EngineSettings::default());
        let response = service.analyze("ITUB4").unwrap();

        assert_eq!(response.ticker, "ITUB4");
        assert_eq!(response.dates.len(), 30);
        assert_eq!(response.summary.latest_close, 30.0);
        assert_eq!(response.summary.previous_close, Some(29.0));
        assert_eq!(response.rsi.trace("RSI").unwrap().values[29], Some(100.0));
        assert_eq!(response.bollinger.traces.len(), 4);
    }

    #[test]
    fn test_analyze_unknown_ticker_is_empty_series() {
        let service = service_with("ITUB4", &[1.0, 2.0], &EngineSettings::default());
        let err = service.analyze("UNKNOWN").unwrap_err();
        assert!(matches!(err, EngineError::EmptySeries { .. }));
        let body = ErrorResponse::from_error("UNKNOWN", &err);
        assert_eq!(body.error, "No data found for the provided ticker.");
        assert_eq!(body.ticker, "UNKNOWN");
    }

    #[test]
    fn test_analyze_applies_history_window() {
        let mut settings = EngineSettings::default();
        settings.data.history_days = Some(9);
        let closes: Vec<f64> = (1u32..=30).map(f64::from).collect();
        let service = service_with("WEGE3", &closes, &settings);
        let response = service.analyze("WEGE3").unwrap();
        assert_eq!(response.dates.len(), 10);
        assert!(response.sma_ema.trace("SMA").unwrap().values.iter().all(Option::is_none));
    }

    #[test]
    fn test_analyze_uses_configured_rsi_levels() {
        let mut settings = EngineSettings::default();
        settings.indicators.rsi_overbought = 80.0;
        settings.indicators.rsi_oversold = 20.0;
        let service = service_with("ABEV3", &[1.0, 2.0, 3.0], &settings);
        let response = service.analyze("ABEV3").unwrap();
        let levels: Vec<f64> = response.rsi.reference_lines.iter().map(|l| l.level).collect();
        assert_eq!(levels, vec![80.0, 20.0]);
    }

    #[test]
    fn test_response_serializes_undefined_as_null() {
        let service = service_with("BBAS3", &[10.0, 11.0], &EngineSettings::default());
        let json = serde_json::to_value(service.analyze("BBAS3").unwrap()).unwrap();
        assert_eq!(json["ticker"], "BBAS3");
        assert_eq!(json["summary"]["percent_change"], 10.0);
        assert_eq!(json["rsi"]["traces"][0]["values"], serde_json::json!([null, null]));
        assert_eq!(json["rsi"]["kind"], "rsi");
    }
}
