//! The indicator engine entry point.
//!
//! [`IndicatorEngine`] owns nothing but its immutable [`IndicatorSettings`],
//! so one instance can be shared across threads and called concurrently.
//! Every transform is independent of the others and of any previous call.

use shared::models::{IndicatorBundle, MovingAverages, PriceSeries};

use crate::config::settings::IndicatorSettings;
use crate::error::EngineError;
use crate::indicators::{Bollinger, Ema, IndicatorCalculator, Rsi, Sma, Volume};
use crate::summary::summarize;

#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    settings: IndicatorSettings,
}

impl IndicatorEngine {
    pub fn new(settings: IndicatorSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Computes every indicator for `series`.
    ///
    /// Fails only on an empty series. Series shorter than a transform's window
    /// produce output that is undefined at every position.
    pub fn compute(&self, series: &PriceSeries) -> Result<IndicatorBundle, EngineError> {
        if series.is_empty() {
            tracing::warn!(
                symbol = %series.symbol(),
                "Refusing to compute indicators on an empty series"
            );
            return Err(EngineError::EmptySeries {
                symbol: series.symbol().to_string(),
            });
        }
        let s = &self.settings;
        tracing::debug!(symbol = %series.symbol(), bars = series.len(), "Computing indicators");

        let bollinger =
            Bollinger::new(s.bollinger_window, s.bollinger_num_std, s.std_dev).calculate(series);
        let volume = Volume.calculate(series);
        let moving_averages = MovingAverages {
            sma: Sma::new(s.sma_window).calculate(series),
            ema: Ema::new(s.ema_span).calculate(series),
        };
        let rsi = Rsi::new(s.rsi_period).calculate(series);
        let summary = summarize(series)?;

        Ok(IndicatorBundle {
            symbol: series.symbol().to_string(),
            dates: series.dates(),
            close: series.closes(),
            bollinger,
            volume,
            moving_averages,
            rsi,
            summary,
        })
    }
}

/// [`IndicatorEngine::compute`] with the default windows.
pub fn compute_indicators(series: &PriceSeries) -> Result<IndicatorBundle, EngineError> {
    IndicatorEngine::default().compute(series)
}
