// Relative Strength Index (RSI) indicator implementation
use super::{finite_only, IndicatorCalculator};
use serde_json::Value;
use shared::models::{IndicatorSeries, PriceSeries};

/// RSI over simple rolling means of gains and losses.
///
/// `delta[i] = close[i] - close[i - 1]` starts at index 1, so the first
/// defined value sits at index `period`. A window with losses but no gains
/// gives 0, gains but no losses gives exactly 100, and a window with neither
/// (flat prices) is undefined.
pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }

    pub fn values(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut results = vec![None; closes.len()];
        if self.period == 0 || closes.len() <= self.period {
            return results;
        }

        // Index 0 has no delta and is never read.
        let mut gains = vec![0.0; closes.len()];
        let mut losses = vec![0.0; closes.len()];
        for i in 1..closes.len() {
            let change = closes[i] - closes[i - 1];
            gains[i] = change.max(0.0);
            losses[i] = (-change).max(0.0);
        }

        let period = self.period as f64;
        for i in self.period..closes.len() {
            let window = i + 1 - self.period..=i;
            let avg_gain = gains[window.clone()].iter().sum::<f64>() / period;
            let avg_loss = losses[window].iter().sum::<f64>() / period;
            results[i] = relative_strength_index(avg_gain, avg_loss);
        }
        results
    }
}

fn relative_strength_index(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { None } else { Some(100.0) };
    }
    let rs = avg_gain / avg_loss;
    Some((100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0))
}

impl IndicatorCalculator for Rsi {
    type Output = IndicatorSeries;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, series: &PriceSeries) -> IndicatorSeries {
        let values = finite_only(&self.name, self.values(&series.closes()));
        IndicatorSeries::new(self.name.clone(), self.parameters(), values)
    }
}
