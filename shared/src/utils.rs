// Numeric helpers shared by the indicator transforms and the summary block.
use crate::models::StdDevConvention;

/// Arithmetic mean. A window of identical values returns that value as is,
/// without the rounding a summed total picks up.
pub fn mean(values: &[f64]) -> Option<f64> {
    let first = *values.first()?;
    if is_constant(values) {
        return Some(first);
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}

/// Standard deviation of `values` under the given convention.
///
/// Returns `None` when the divisor would be zero: an empty slice, or a single
/// value under the sample convention.
pub fn std_dev(values: &[f64], convention: StdDevConvention) -> Option<f64> {
    let m = mean(values)?;
    let divisor = match convention {
        StdDevConvention::Population => values.len(),
        StdDevConvention::Sample => values.len().checked_sub(1).filter(|&d| d > 0)?,
    };
    if is_constant(values) {
        return Some(0.0);
    }
    let squares: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((squares / divisor as f64).sqrt())
}

/// Percentage move from `previous` to `latest`; `None` when `previous` is zero.
pub fn percent_change(previous: f64, latest: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    let change = (latest - previous) * 100.0 / previous;
    change.is_finite().then_some(change)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
    }

    #[test]
    fn test_mean_of_constant_window_is_exact() {
        for c in [0.1, 10.1, 185.64] {
            assert_eq!(mean(&[c; 20]), Some(c));
        }
    }

    #[test]
    fn test_std_dev_of_constant_window_is_zero() {
        for c in [0.1, 10.1, 185.64] {
            assert_eq!(std_dev(&[c; 20], StdDevConvention::Sample), Some(0.0));
            assert_eq!(std_dev(&[c; 20], StdDevConvention::Population), Some(0.0));
        }
    }

    #[test]
    fn test_std_dev_conventions() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(std_dev(&values, StdDevConvention::Population), Some(2.0));
        let sample = std_dev(&values, StdDevConvention::Sample).unwrap();
        assert!((sample - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_degenerate_inputs() {
        assert_eq!(std_dev(&[], StdDevConvention::Population), None);
        assert_eq!(std_dev(&[3.0], StdDevConvention::Sample), None);
        assert_eq!(std_dev(&[3.0], StdDevConvention::Population), Some(0.0));
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(100.0, 110.0), Some(10.0));
        assert_eq!(percent_change(200.0, 150.0), Some(-25.0));
        assert_eq!(percent_change(0.0, 110.0), None);
    }
}
