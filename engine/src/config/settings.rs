// Engine settings, loaded from an optional JSON file and overridden from the command line
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use shared::models::StdDevConvention;

use crate::data::csv_parser::CsvDialect;
use crate::error::EngineError;

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct EngineSettings {
    pub indicators: IndicatorSettings,
    pub data: DataSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IndicatorSettings {
    pub bollinger_window: usize,
    pub bollinger_num_std: f64,
    pub std_dev: StdDevConvention,
    pub sma_window: usize,
    pub ema_span: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        IndicatorSettings {
            bollinger_window: 20,
            bollinger_num_std: 2.0,
            std_dev: StdDevConvention::Sample,
            sma_window: 20,
            ema_span: 20,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataSettings {
    pub dir: PathBuf,
    pub dialect: CsvDialect,
    /// Length of the trailing window kept before computing; `None` keeps everything.
    pub history_days: Option<i64>,
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings {
            dir: PathBuf::from("data"),
            dialect: CsvDialect::Standard,
            history_days: Some(365),
        }
    }
}

impl EngineSettings {
    /// Reads settings from `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let settings = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|e| {
                    EngineError::ConfigError(format!("cannot read '{}': {}", path.display(), e))
                })?;
                let parsed: EngineSettings = serde_json::from_str(&raw).map_err(|e| {
                    EngineError::ConfigError(format!("cannot parse '{}': {}", path.display(), e))
                })?;
                tracing::debug!(path = %path.display(), "Loaded engine settings");
                parsed
            }
            None => EngineSettings::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Applies a history length given on the command line. Zero keeps the
    /// whole series; a negative count is rejected like it is in the file.
    pub fn override_history_days(&mut self, days: i64) -> Result<(), EngineError> {
        if days < 0 {
            return Err(EngineError::ConfigError(format!(
                "history_days must not be negative, got {}",
                days
            )));
        }
        self.data.history_days = (days > 0).then_some(days);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.indicators.validate()?;
        if let Some(days) = self.data.history_days {
            if days <= 0 {
                return Err(EngineError::ConfigError(format!(
                    "history_days must be positive, got {}",
                    days
                )));
            }
        }
        Ok(())
    }
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        let windows = [
            ("bollinger_window", self.bollinger_window),
            ("sma_window", self.sma_window),
            ("ema_span", self.ema_span),
            ("rsi_period", self.rsi_period),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(EngineError::ConfigError(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }
        if self.std_dev == StdDevConvention::Sample && self.bollinger_window < 2 {
            return Err(EngineError::ConfigError(
                "bollinger_window must be at least 2 for the sample deviation".to_string(),
            ));
        }
        if !(self.bollinger_num_std.is_finite() && self.bollinger_num_std > 0.0) {
            return Err(EngineError::ConfigError(format!(
                "bollinger_num_std must be positive, got {}",
                self.bollinger_num_std
            )));
        }
        if !(0.0..=100.0).contains(&self.rsi_oversold)
            || !(0.0..=100.0).contains(&self.rsi_overbought)
            || self.rsi_oversold >= self.rsi_overbought
        {
            return Err(EngineError::ConfigError(format!(
                "RSI levels must satisfy 0 <= oversold < overbought <= 100, got {} and {}",
                self.rsi_oversold, self.rsi_overbought
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let settings = EngineSettings::load(None).unwrap();
        assert_eq!(settings.indicators.bollinger_window, 20);
        assert_eq!(settings.indicators.rsi_period, 14);
        assert_eq!(settings.indicators.std_dev, StdDevConvention::Sample);
        assert_eq!(settings.data.history_days, Some(365));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{ "indicators": {{ "rsi_period": 9, "std_dev": "population" }},
                 "data": {{ "dialect": "brazilian" }} }}"#
        )
        .unwrap();
        let settings = EngineSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.indicators.rsi_period, 9);
        assert_eq!(settings.indicators.std_dev, StdDevConvention::Population);
        assert_eq!(settings.indicators.sma_window, 20);
        assert_eq!(settings.data.dialect, CsvDialect::Brazilian);
        assert_eq!(settings.data.dir, PathBuf::from("data"));
    }

    #[test]
    fn test_rejects_zero_window() {
        let settings = IndicatorSettings {
            sma_window: 0,
            ..IndicatorSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("sma_window"));
    }

    #[test]
    fn test_rejects_single_point_sample_window() {
        let settings = IndicatorSettings {
            bollinger_window: 1,
            ..IndicatorSettings::default()
        };
        assert!(settings.validate().is_err());
        let population = IndicatorSettings {
            bollinger_window: 1,
            std_dev: StdDevConvention::Population,
            ..IndicatorSettings::default()
        };
        assert!(population.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_rsi_levels() {
        let settings = IndicatorSettings {
            rsi_overbought: 30.0,
            rsi_oversold: 70.0,
            ..IndicatorSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_history_days_override() {
        let mut settings = EngineSettings::default();
        settings.override_history_days(30).unwrap();
        assert_eq!(settings.data.history_days, Some(30));
        settings.override_history_days(0).unwrap();
        assert_eq!(settings.data.history_days, None);

        let err = settings.override_history_days(-5).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
        assert_eq!(settings.data.history_days, None);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        let err = EngineSettings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }
}
