// Simple Moving Average (SMA) indicator implementation
use super::{finite_only, rolling, IndicatorCalculator};
use serde_json::Value;
use shared::models::{IndicatorSeries, PriceSeries};
use shared::utils::mean;

pub struct Sma {
    name: String,
    window: usize,
}

impl Sma {
    pub fn new(window: usize) -> Self {
        Self {
            name: format!("SMA({})", window),
            window,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Mean of each trailing window; the Bollinger middle band uses the same values.
    pub fn values(&self, closes: &[f64]) -> Vec<Option<f64>> {
        rolling(closes, self.window, mean)
    }
}

impl IndicatorCalculator for Sma {
    type Output = IndicatorSeries;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "window": self.window })
    }

    fn calculate(&self, series: &PriceSeries) -> IndicatorSeries {
        let values = finite_only(&self.name, self.values(&series.closes()));
        IndicatorSeries::new(self.name.clone(), self.parameters(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::series_from_closes;

    #[test]
    fn test_sma_calculation() {
        let series = series_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let results = Sma::new(3).calculate(&series);
        assert_eq!(results.values, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(results.name, "SMA(3)");
    }

    #[test]
    fn test_sma_insufficient_data() {
        let series = series_from_closes(&[1.0, 2.0]);
        let results = Sma::new(3).calculate(&series);
        assert_eq!(results.values, vec![None, None]);
    }

    #[test]
    fn test_sma_exactly_one_window() {
        let closes: Vec<f64> = (1u32..=20).map(f64::from).collect();
        let results = Sma::new(20).calculate(&series_from_closes(&closes));
        assert_eq!(results.defined_count(), 1);
        assert_eq!(results.get(19), Some(10.5));
    }

    #[test]
    fn test_sma_window_one() {
        let series = series_from_closes(&[1.0, 2.0, 3.0]);
        let results = Sma::new(1).calculate(&series);
        assert_eq!(results.values, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_sma_parameters() {
        assert_eq!(Sma::new(20).parameters(), serde_json::json!({ "window": 20 }));
    }
}
