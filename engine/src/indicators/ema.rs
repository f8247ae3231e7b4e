// Exponential Moving Average (EMA) indicator implementation
use super::{finite_only, IndicatorCalculator};
use serde_json::Value;
use shared::models::{IndicatorSeries, PriceSeries};

/// Recursive EMA seeded with the first close, so it is defined from index 0.
pub struct Ema {
    name: String,
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self {
            name: format!("EMA({})", span),
            span,
        }
    }

    /// Smoothing factor `2 / (span + 1)`.
    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }

    pub fn values(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let alpha = self.alpha();
        let mut results = Vec::with_capacity(closes.len());
        let mut previous: Option<f64> = None;
        for &close in closes {
            let ema = match previous {
                None => close,
                Some(prev) => prev + alpha * (close - prev),
            };
            results.push(Some(ema));
            previous = Some(ema);
        }
        results
    }
}

impl IndicatorCalculator for Ema {
    type Output = IndicatorSeries;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "span": self.span, "alpha": self.alpha() })
    }

    fn calculate(&self, series: &PriceSeries) -> IndicatorSeries {
        let values = finite_only(&self.name, self.values(&series.closes()));
        IndicatorSeries::new(self.name.clone(), self.parameters(), values)
    }
}
