// Technical indicators module
pub mod bollinger;
pub mod ema;
pub mod rsi;
pub mod sma;
pub mod volume;

pub use bollinger::Bollinger;
pub use ema::Ema;
pub use rsi::Rsi;
pub use sma::Sma;
pub use volume::Volume;

use serde_json::Value;
use shared::models::PriceSeries;

/// Common trait for all indicators. Each one is a pure function of the
/// series' close/volume columns; implementations hold only their parameters.
pub trait IndicatorCalculator: Send + Sync {
    type Output;

    fn name(&self) -> &str;
    fn parameters(&self) -> Value;
    fn calculate(&self, series: &PriceSeries) -> Self::Output;
}

/// Applies `f` to every full trailing window of `values`.
///
/// The result has the same length as `values`; the first `window - 1`
/// positions (or all of them, for a short input) are `None`.
pub(crate) fn rolling<F>(values: &[f64], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    for end in window..=values.len() {
        out[end - 1] = f(&values[end - window..end]);
    }
    out
}

/// Drops any non-finite value so NaN or infinity never leaves the engine.
pub(crate) fn finite_only(indicator: &str, values: Vec<Option<f64>>) -> Vec<Option<f64>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Some(v) if !v.is_finite() => {
                tracing::warn!(
                    indicator,
                    index,
                    value = v,
                    "Discarding non-finite indicator value"
                );
                None
            }
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_marks_warm_up_as_undefined() {
        let out = rolling(&[1.0, 2.0, 3.0, 4.0], 3, |w| Some(w.iter().sum()));
        assert_eq!(out, vec![None, None, Some(6.0), Some(9.0)]);
    }

    #[test]
    fn test_rolling_short_input() {
        let out = rolling(&[1.0, 2.0], 3, |w| Some(w[0]));
        assert_eq!(out, vec![None, None]);
        assert!(rolling(&[], 3, |w| Some(w[0])).is_empty());
    }

    #[test]
    fn test_finite_only_replaces_nan_and_infinity() {
        let out = finite_only("TEST", vec![Some(1.0), Some(f64::NAN), None, Some(f64::INFINITY)]);
        assert_eq!(out, vec![Some(1.0), None, None, None]);
    }
}
