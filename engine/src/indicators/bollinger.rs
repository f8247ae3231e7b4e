// Bollinger Bands indicator implementation
//
// middle = SMA(close, window)
// upper  = middle + num_std * stddev(close, window)
// lower  = middle - num_std * stddev(close, window)
//
// The standard deviation uses the sample convention (N - 1) unless configured
// otherwise, which gives slightly wider bands than TA-Lib's population figure.
use super::{finite_only, rolling, IndicatorCalculator, Sma};
use serde_json::Value;
use shared::models::{BollingerBands, IndicatorSeries, PriceSeries, StdDevConvention};
use shared::utils::std_dev;

pub struct Bollinger {
    name: String,
    sma: Sma,
    num_std: f64,
    convention: StdDevConvention,
}

impl Bollinger {
    pub fn new(window: usize, num_std: f64, convention: StdDevConvention) -> Self {
        Self {
            name: format!("BB({}, {})", window, num_std),
            sma: Sma::new(window),
            num_std,
            convention,
        }
    }

    fn band(&self, label: &str, values: Vec<Option<f64>>) -> IndicatorSeries {
        let name = format!("{} {}", self.name, label);
        let values = finite_only(&name, values);
        IndicatorSeries::new(name, self.parameters(), values)
    }
}

impl IndicatorCalculator for Bollinger {
    type Output = BollingerBands;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "window": self.sma.window(),
            "num_std": self.num_std,
            "std_dev": self.convention,
        })
    }

    fn calculate(&self, series: &PriceSeries) -> BollingerBands {
        let closes = series.closes();
        let middle = self.sma.values(&closes);
        let deviation = rolling(&closes, self.sma.window(), |w| std_dev(w, self.convention));

        let offset = |sign: f64| -> Vec<Option<f64>> {
            middle
                .iter()
                .zip(&deviation)
                .map(|(m, d)| Some((*m)? + sign * self.num_std * (*d)?))
                .collect()
        };
        let upper = offset(1.0);
        let lower = offset(-1.0);

        BollingerBands {
            middle: self.band("Middle", middle),
            upper: self.band("Upper", upper),
            lower: self.band("Lower", lower),
        }
    }
}
