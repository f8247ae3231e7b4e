// Volume pass-through, exposed as a series so it is presented like the others
use super::{finite_only, IndicatorCalculator};
use serde_json::Value;
use shared::models::{IndicatorSeries, PriceSeries};

#[derive(Default)]
pub struct Volume;

impl IndicatorCalculator for Volume {
    type Output = IndicatorSeries;

    fn name(&self) -> &str {
        "Volume"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({})
    }

    fn calculate(&self, series: &PriceSeries) -> IndicatorSeries {
        let values = series.volumes().into_iter().map(Some).collect();
        IndicatorSeries::new(self.name(), self.parameters(), finite_only(self.name(), values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::series_from_bars;

    #[test]
    fn test_volume_is_identity() {
        let series = series_from_bars(&[(10.0, 1_500.0), (11.0, 0.0), (12.0, 2_250.5)]);
        let results = Volume.calculate(&series);
        assert_eq!(results.values, vec![Some(1_500.0), Some(0.0), Some(2_250.5)]);
        assert_eq!(results.name, "Volume");
    }
}
