use shared::models::SeriesError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No price data for symbol '{symbol}'")]
    EmptySeries { symbol: String },

    #[error("Invalid symbol '{0}'")]
    InvalidSymbol(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Invalid price series: {source}")]
    InvalidSeries {
        #[from]
        source: SeriesError,
    },

    #[error("Invalid indicator parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl EngineError {
    /// Text safe to hand back to the client that made the request.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::EmptySeries { .. } => "No data found for the provided ticker.".to_string(),
            EngineError::InvalidSymbol(symbol) => format!("'{}' is not a valid ticker.", symbol),
            EngineError::CsvSystemError { .. }
            | EngineError::CsvDataFormatError(_)
            | EngineError::InvalidSeries { .. } => {
                format!("The price data could not be read: {}", self)
            }
            EngineError::ConfigError(_)
            | EngineError::IoError { .. }
            | EngineError::InvalidParameter(_)
            | EngineError::Serialization { .. } => format!("An internal error occurred: {}", self),
        }
    }

    /// Process exit status: 2 for problems with the request or its data, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::EmptySeries { .. }
            | EngineError::InvalidSymbol(_)
            | EngineError::CsvSystemError { .. }
            | EngineError::CsvDataFormatError(_)
            | EngineError::InvalidSeries { .. } => 2,
            EngineError::ConfigError(_)
            | EngineError::IoError { .. }
            | EngineError::InvalidParameter(_)
            | EngineError::Serialization { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series_is_a_client_error() {
        let err = EngineError::EmptySeries {
            symbol: "NOPE".to_string(),
        };
        assert_eq!(err.to_string(), "No price data for symbol 'NOPE'");
        assert_eq!(err.user_message(), "No data found for the provided ticker.");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_io_error_is_internal() {
        let err: EngineError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_message().starts_with("An internal error occurred"));
    }
}
