// Headline figures computed straight from the raw series
use shared::models::{PriceSeries, SummaryStats};
use shared::utils::{mean, percent_change};

use crate::error::EngineError;

pub fn summarize(series: &PriceSeries) -> Result<SummaryStats, EngineError> {
    let empty = || EngineError::EmptySeries {
        symbol: series.symbol().to_string(),
    };
    let bars = series.bars();
    let latest = bars.last().ok_or_else(empty)?.close;
    let previous = bars.len().checked_sub(2).map(|i| bars[i].close);
    let avg_volume = mean(&series.volumes()).ok_or_else(empty)?;

    Ok(SummaryStats {
        latest_close: latest,
        previous_close: previous,
        percent_change: previous.and_then(|p| percent_change(p, latest)),
        avg_volume,
    })
}
